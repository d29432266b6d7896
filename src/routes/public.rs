use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// The whole anonymous surface of the platform: every read endpoint plus the
/// identity gateway (signup, signin, availability probes).
///
/// Every mutation lives in the authenticated router; nothing in this module
/// writes to the database except account registration.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness endpoint for monitors and load balancers. Answers "ok"
        // without touching the database.
        .route("/health", get(|| async { "ok" }))
        // --- Identity Gateway ---
        // POST /api/auth/signup
        // Creates an account. The first account ever registered becomes the admin.
        .route("/api/auth/signup", post(handlers::auth::signup))
        // POST /api/auth/signin
        // Exchanges credentials (username or email + password) for a JWT.
        .route("/api/auth/signin", post(handlers::auth::signin))
        // GET /api/users/check/username-availability?username=...
        // GET /api/users/check/email-availability?email=...
        // Pre-flight checks used by signup forms.
        .route(
            "/api/users/check/username-availability",
            get(handlers::users::check_username_availability),
        )
        .route(
            "/api/users/check/email-availability",
            get(handlers::users::check_email_availability),
        )
        // GET /api/users/{username}/profile
        // Public profile card with the user's post count.
        .route(
            "/api/users/{username}/profile",
            get(handlers::users::get_user_profile),
        )
        // --- Posts ---
        // GET /api/posts?page=...&size=...
        // Paginated, newest first, tags included.
        .route("/api/posts", get(handlers::posts::get_all_posts))
        // GET /api/posts/category/{id}
        // GET /api/posts/tag/{id}
        // Filtered listings. The static segments take precedence over the
        // {id} capture below, so the three routes coexist.
        .route(
            "/api/posts/category/{id}",
            get(handlers::posts::get_posts_by_category),
        )
        .route("/api/posts/tag/{id}", get(handlers::posts::get_posts_by_tag))
        // GET /api/posts/{id}
        .route("/api/posts/{id}", get(handlers::posts::get_post))
        // --- Comments (addressed through their post) ---
        .route(
            "/api/posts/{post_id}/comments",
            get(handlers::comments::get_all_comments),
        )
        .route(
            "/api/posts/{post_id}/comments/{id}",
            get(handlers::comments::get_comment),
        )
        // --- Albums & Photos ---
        .route("/api/albums", get(handlers::albums::get_all_albums))
        .route("/api/albums/{id}", get(handlers::albums::get_album))
        // GET /api/albums/{id}/photos
        // The only way photos are listed per album; album payloads never embed them.
        .route(
            "/api/albums/{id}/photos",
            get(handlers::albums::get_album_photos),
        )
        .route("/api/photos", get(handlers::photos::get_all_photos))
        .route("/api/photos/{id}", get(handlers::photos::get_photo))
        // --- Vocabularies ---
        .route("/api/tags", get(handlers::tags::get_all_tags))
        .route("/api/tags/{id}", get(handlers::tags::get_tag))
        .route(
            "/api/categories",
            get(handlers::categories::get_all_categories),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::categories::get_category),
        )
}
