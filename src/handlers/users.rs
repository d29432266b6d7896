use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    auth::{AuthUser, hash_password},
    error::{ApiError, ApiResult, bad_request, not_found},
    models::{
        ApiResponse, NewUser, SignUpRequest, UpdateUserRequest, User, UserIdentityAvailability,
        UserProfile, UserSummary, UserUpdate,
    },
};

// --- Query Parameter Structs ---

/// UsernameQuery
///
/// Bound by the username availability probe (`?username=<value>`).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct UsernameQuery {
    pub username: String,
}

/// EmailQuery
#[derive(Deserialize, utoipa::IntoParams)]
pub struct EmailQuery {
    pub email: String,
}

// --- Handlers ---

/// get_current_user
///
/// [Authenticated Route] Returns the identity summary of the requesting user.
/// The record is re-read from the database so the response reflects any updates
/// made since the token was issued.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Current user", body = UserSummary))
)]
pub async fn get_current_user(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<UserSummary>> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| not_found("User", "id", id))?;

    Ok(Json(UserSummary::from(user)))
}

/// check_username_availability
///
/// [Public Route] Tells signup forms whether a username is still free.
#[utoipa::path(
    get,
    path = "/api/users/check/username-availability",
    params(UsernameQuery),
    responses((status = 200, description = "Availability", body = UserIdentityAvailability))
)]
pub async fn check_username_availability(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<UserIdentityAvailability>> {
    let taken = state
        .repo
        .username_exists(&query.username.to_lowercase())
        .await?;

    Ok(Json(UserIdentityAvailability { available: !taken }))
}

/// check_email_availability
///
/// [Public Route] Tells signup forms whether an email is still free.
#[utoipa::path(
    get,
    path = "/api/users/check/email-availability",
    params(EmailQuery),
    responses((status = 200, description = "Availability", body = UserIdentityAvailability))
)]
pub async fn check_email_availability(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<UserIdentityAvailability>> {
    let taken = state.repo.email_exists(&query.email.to_lowercase()).await?;

    Ok(Json(UserIdentityAvailability { available: !taken }))
}

/// get_user_profile
///
/// [Public Route] Public profile view for any username, enriched with the
/// number of posts the user has written.
#[utoipa::path(
    get,
    path = "/api/users/{username}/profile",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 404, description = "Unknown username", body = ApiResponse)
    )
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let user = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    let post_count = state.repo.count_posts_by_user(user.id).await?;

    Ok(Json(UserProfile {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        joined_at: user.created_at,
        post_count,
    }))
}

/// add_user
///
/// [Admin Route] Creates an account on someone's behalf. Unlike signup, the
/// first-account promotion never applies here: the new account is always a
/// regular user until an admin says otherwise.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 403, description = "Caller is not an admin", body = ApiResponse)
    )
)]
pub async fn add_user(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if role != "admin" {
        return Err(ApiError::Forbidden);
    }

    payload.validate()?;

    if state.repo.username_exists(&payload.username.to_lowercase()).await? {
        return Err(bad_request("Username is already taken"));
    }

    if state.repo.email_exists(&payload.email.to_lowercase()).await? {
        return Err(bad_request("Email is already taken"));
    }

    let new_user = NewUser {
        username: payload.username.to_lowercase(),
        email: payload.email.to_lowercase(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash: hash_password(&payload.password)?,
        role: "user".to_string(),
    };

    let user = state.repo.create_user(new_user).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// update_user
///
/// [Authenticated Route] Partial update of an account. Users may edit
/// themselves; admins may edit anyone. A provided password is re-hashed, a
/// provided email is checked against other accounts before it is applied.
#[utoipa::path(
    put,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 403, description = "Not the account owner", body = ApiResponse),
        (status = 404, description = "Unknown username", body = ApiResponse)
    )
)]
pub async fn update_user(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    payload.validate()?;

    let target = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    if target.id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    if let Some(email) = &payload.email {
        let email = email.to_lowercase();
        if email != target.email && state.repo.email_exists(&email).await? {
            return Err(bad_request("Email is already taken"));
        }
    }

    let update = UserUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email.map(|e| e.to_lowercase()),
        password_hash: payload.password.as_deref().map(hash_password).transpose()?,
    };

    let user = state
        .repo
        .update_user(target.id, update)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    Ok(Json(user))
}

/// delete_user
///
/// [Authenticated Route] Removes an account and, through cascading foreign
/// keys, everything it owns. Users may delete themselves; admins anyone.
#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the account owner", body = ApiResponse),
        (status = 404, description = "Unknown username", body = ApiResponse)
    )
)]
pub async fn delete_user(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    let target = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    if target.id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_user(target.id).await?;

    Ok(Json(ApiResponse::ok(format!(
        "You successfully deleted profile of: {username}"
    ))))
}

/// give_admin
///
/// [Admin Route] Grants the admin role to a user.
#[utoipa::path(
    put,
    path = "/api/users/{username}/give-admin",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Role granted", body = ApiResponse),
        (status = 403, description = "Caller is not an admin", body = ApiResponse),
        (status = 404, description = "Unknown username", body = ApiResponse)
    )
)]
pub async fn give_admin(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    if role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let target = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    state.repo.set_user_role(target.id, "admin").await?;

    Ok(Json(ApiResponse::ok(format!(
        "You gave ADMIN role to user: {username}"
    ))))
}

/// take_admin
///
/// [Admin Route] Revokes the admin role, demoting the user back to a regular
/// account. Nothing stops an admin from demoting themselves.
#[utoipa::path(
    put,
    path = "/api/users/{username}/take-admin",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Role revoked", body = ApiResponse),
        (status = 403, description = "Caller is not an admin", body = ApiResponse),
        (status = 404, description = "Unknown username", body = ApiResponse)
    )
)]
pub async fn take_admin(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    if role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let target = state
        .repo
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| not_found("User", "username", &username))?;

    state.repo.set_user_role(target.id, "user").await?;

    Ok(Json(ApiResponse::ok(format!(
        "You took ADMIN role from user: {username}"
    ))))
}
