use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    AppState,
    auth::{create_token, hash_password, verify_password},
    error::{ApiResult, bad_request, unauthorized},
    models::{ApiResponse, JwtAuthenticationResponse, LoginRequest, NewUser, SignUpRequest},
};

/// signup
///
/// [Public Route] Registers a new account. The very first account ever created
/// is promoted to admin so a fresh deployment always has one; everybody after
/// that starts as a regular user.
///
/// *Note*: Username and email are stored lowercased, and both carry unique
/// constraints checked up front for a precise error message.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Registered", body = ApiResponse),
        (status = 400, description = "Validation failed or identity taken", body = ApiResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    payload.validate()?;

    if state.repo.username_exists(&payload.username.to_lowercase()).await? {
        return Err(bad_request("Username is already taken"));
    }

    if state.repo.email_exists(&payload.email.to_lowercase()).await? {
        return Err(bad_request("Email is already taken"));
    }

    let role = if state.repo.count_users().await? == 0 {
        "admin"
    } else {
        "user"
    };

    let new_user = NewUser {
        username: payload.username.to_lowercase(),
        email: payload.email.to_lowercase(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash: hash_password(&payload.password)?,
        role: role.to_string(),
    };

    state.repo.create_user(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully")),
    ))
}

/// signin
///
/// [Public Route] Exchanges credentials for a signed JWT. The identifier field
/// matches either the username or the email column.
///
/// *Security*: Unknown identifier and wrong password produce the identical 401
/// so the endpoint cannot be used to probe for registered accounts.
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = JwtAuthenticationResponse),
        (status = 401, description = "Bad credentials", body = ApiResponse)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<JwtAuthenticationResponse>> {
    payload.validate()?;

    // Identities are stored lowercased, so the lookup key is normalized the
    // same way signup normalizes it.
    let user = state
        .repo
        .get_user_by_username_or_email(&payload.username_or_email.to_lowercase())
        .await?
        .ok_or_else(|| unauthorized("Invalid username/email or password"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(unauthorized("Invalid username/email or password"));
    }

    let token = create_token(user.id, &state.config)?;

    Ok(Json(JwtAuthenticationResponse::new(token)))
}
