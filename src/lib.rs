use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repository;

// Route tables, split by trust level.
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// What main.rs (and the spawned-server tests) need to assemble the service.
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Collects every `#[utoipa::path]` handler and `ToSchema` model into the
/// OpenAPI document served at `/api-docs/openapi.json`. A handler missing
/// from this list silently disappears from the Swagger UI, so the list is
/// kept in route-table order for easy auditing.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup, handlers::auth::signin,
        handlers::users::get_current_user, handlers::users::check_username_availability,
        handlers::users::check_email_availability, handlers::users::get_user_profile,
        handlers::users::add_user, handlers::users::update_user, handlers::users::delete_user,
        handlers::users::give_admin, handlers::users::take_admin,
        handlers::posts::get_all_posts, handlers::posts::get_posts_by_category,
        handlers::posts::get_posts_by_tag, handlers::posts::get_post, handlers::posts::add_post,
        handlers::posts::update_post, handlers::posts::delete_post,
        handlers::comments::get_all_comments, handlers::comments::add_comment,
        handlers::comments::get_comment, handlers::comments::update_comment,
        handlers::comments::delete_comment,
        handlers::albums::get_all_albums, handlers::albums::get_album,
        handlers::albums::get_album_photos, handlers::albums::add_album,
        handlers::albums::update_album, handlers::albums::delete_album,
        handlers::photos::get_all_photos, handlers::photos::get_photo,
        handlers::photos::add_photo, handlers::photos::update_photo,
        handlers::photos::delete_photo,
        handlers::tags::get_all_tags, handlers::tags::get_tag, handlers::tags::add_tag,
        handlers::tags::update_tag, handlers::tags::delete_tag,
        handlers::categories::get_all_categories, handlers::categories::get_category,
        handlers::categories::add_category, handlers::categories::update_category,
        handlers::categories::delete_category
    ),
    components(
        schemas(
            models::User, models::Comment, models::Album, models::Photo, models::Tag,
            models::Category, models::SignUpRequest, models::LoginRequest, models::PostRequest,
            models::CommentRequest, models::AlbumRequest, models::PhotoRequest,
            models::TagRequest, models::CategoryRequest, models::UpdateUserRequest,
            models::ApiResponse, models::JwtAuthenticationResponse, models::PostResponse,
            models::UserSummary, models::UserProfile, models::UserIdentityAvailability,
            pagination::PagedResponse<models::PostResponse>,
            pagination::PagedResponse<models::Comment>,
            pagination::PagedResponse<models::Album>,
            pagination::PagedResponse<models::Photo>,
            pagination::PagedResponse<models::Tag>,
            pagination::PagedResponse<models::Category>,
        )
    ),
    tags(
        (name = "blog-api", description = "Blogging platform REST API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The one shared, immutable container handed to every request: the repository
/// trait object plus the loaded configuration. Cloning is cheap (an Arc and a
/// small config struct), which is what axum's state model expects.
#[derive(Clone)]
pub struct AppState {
    /// Data access behind the `Repository` trait.
    pub repo: RepositoryState,
    /// Environment configuration, loaded once at startup.
    pub config: AppConfig,
}

// --- FromRef Implementations ---

// Let extractors (notably AuthUser) pull just the piece of state they need.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the authenticated route group. The body is empty on purpose: all
/// the work happens in the `AuthUser` extractor, which rejects with 401 before
/// this function runs when the token is missing, invalid, expired, or points
/// at a deleted account.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Builds the full service: swagger, the three route groups, shared state,
/// and the observability layers around the outside.
pub fn create_router(state: AppState) -> Router {
    // Wide-open CORS. The API is public and token-authenticated, so there is
    // nothing origin-scoped to protect.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Swagger UI plus the OpenAPI JSON it reads.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Anonymous surface.
        .merge(public::public_routes())
        // Mutation surface, rejected at the layer when the caller has no
        // valid identity.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin surface. The role check runs inside each handler, right
        // after the AuthUser extractor authenticates the caller.
        .merge(admin::admin_routes())
        .with_state(state);

    // Request-id first, so the trace span can pick it up; propagation last,
    // so the same id goes back out to the client.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: one span per request carrying the method,
/// the URI, and the generated request id, so every log line emitted while
/// handling a request can be grepped by that id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
