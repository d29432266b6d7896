use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every mutation of the content model plus the caller's own account surface.
///
/// Access Control Strategy:
/// The auth middleware sits on the layer above this module, so each handler
/// starts from a validated `AuthUser` (id + role). Ownership is then decided
/// per resource: fetch, compare the owner against the caller, allow admins
/// through, otherwise 403.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/users/me
        // The authenticated user's own identity summary.
        .route("/api/users/me", get(handlers::users::get_current_user))
        // PUT/DELETE /api/users/{username}
        // Account self-service. Admins may edit or delete any account.
        .route(
            "/api/users/{username}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        // --- Posts ---
        // POST /api/posts
        // Creates a post owned by the caller; the owner is never taken from the payload.
        .route("/api/posts", post(handlers::posts::add_post))
        // PUT/DELETE /api/posts/{id}
        // Owner-or-admin, checked in the handler after the post is fetched.
        .route(
            "/api/posts/{id}",
            put(handlers::posts::update_post).delete(handlers::posts::delete_post),
        )
        // --- Comments ---
        .route(
            "/api/posts/{post_id}/comments",
            post(handlers::comments::add_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{id}",
            put(handlers::comments::update_comment).delete(handlers::comments::delete_comment),
        )
        // --- Albums ---
        .route("/api/albums", post(handlers::albums::add_album))
        .route(
            "/api/albums/{id}",
            put(handlers::albums::update_album).delete(handlers::albums::delete_album),
        )
        // --- Photos ---
        // Photo mutations authorize through the owning album.
        .route("/api/photos", post(handlers::photos::add_photo))
        .route(
            "/api/photos/{id}",
            put(handlers::photos::update_photo).delete(handlers::photos::delete_photo),
        )
        // --- Vocabularies ---
        .route("/api/tags", post(handlers::tags::add_tag))
        .route(
            "/api/tags/{id}",
            put(handlers::tags::update_tag).delete(handlers::tags::delete_tag),
        )
        .route("/api/categories", post(handlers::categories::add_category))
        .route(
            "/api/categories/{id}",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
}
