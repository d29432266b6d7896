use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to users with the 'admin' role:
/// account provisioning and role management.
///
/// Access Control:
/// Each handler here takes the `AuthUser` extractor directly, so an anonymous
/// caller is rejected with a 401 before the handler body runs, and the handler
/// then explicitly checks for `role='admin'` (403 otherwise). The routes are
/// merged without the shared auth middleware because the extractor already
/// performs that work.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /api/users
        // Provisions an account on someone's behalf; always a regular user.
        .route("/api/users", post(handlers::users::add_user))
        // PUT /api/users/{username}/give-admin
        // PUT /api/users/{username}/take-admin
        // Grants or revokes the admin role.
        .route(
            "/api/users/{username}/give-admin",
            put(handlers::users::give_admin),
        )
        .route(
            "/api/users/{username}/take-admin",
            put(handlers::users::take_admin),
        )
}
