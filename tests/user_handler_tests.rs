mod common;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use blog_api::{
    auth::hash_password,
    error::ApiError,
    handlers::{auth, users},
    models::{LoginRequest, UpdateUserRequest},
};
use common::{
    ADMIN_ID, MockRepo, OTHER_ID, OWNER_ID, as_admin, as_user, post_fixture, signup_request,
    test_state, user_fixture,
};
use std::sync::Arc;

// --- SIGNUP ---

#[tokio::test]
async fn test_first_signup_becomes_admin() {
    let repo = Arc::new(MockRepo::default());
    let state = test_state(repo.clone());

    let (status, Json(ack)) = auth::signup(State(state), Json(signup_request("pioneer")))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(ack.success);
    assert_eq!(ack.message, "User registered successfully");

    let users = repo.users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, "admin");
}

#[tokio::test]
async fn test_second_signup_is_regular_user() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "admin"));
    let state = test_state(repo.clone());

    auth::signup(State(state), Json(signup_request("latecomer")))
        .await
        .unwrap();

    let users = repo.users.lock().unwrap();
    let latecomer = users.iter().find(|u| u.username == "latecomer").unwrap();
    assert_eq!(latecomer.role, "user");
}

#[tokio::test]
async fn test_signup_lowercases_identity() {
    let repo = Arc::new(MockRepo::default());
    let state = test_state(repo.clone());

    let mut payload = signup_request("MixedCase");
    payload.email = "MiXed@Example.com".to_string();

    auth::signup(State(state), Json(payload)).await.unwrap();

    let users = repo.users.lock().unwrap();
    assert_eq!(users[0].username, "mixedcase");
    assert_eq!(users[0].email, "mixed@example.com");
}

#[tokio::test]
async fn test_signup_rejects_taken_username() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "taken", "user"));
    let state = test_state(repo);

    let err = auth::signup(State(state), Json(signup_request("taken")))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Username is already taken");
}

#[tokio::test]
async fn test_signup_rejects_taken_email() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "occupant", "user"));
    let state = test_state(repo);

    let mut payload = signup_request("fresh");
    payload.email = "occupant@example.com".to_string();

    let err = auth::signup(State(state), Json(payload)).await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Email is already taken");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let state = test_state(Arc::new(MockRepo::default()));

    let mut payload = signup_request("fresh");
    payload.password = "tiny".to_string();

    let err = auth::signup(State(state), Json(payload)).await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

// --- SIGNIN ---

#[tokio::test]
async fn test_signin_returns_bearer_token() {
    let repo = Arc::new(MockRepo::default());
    let mut user = user_fixture(OWNER_ID, "pioneer", "user");
    user.password_hash = hash_password("password123").unwrap();
    repo.seed_user(user);
    let state = test_state(repo);

    let payload = LoginRequest {
        username_or_email: "pioneer".to_string(),
        password: "password123".to_string(),
    };
    let Json(token) = auth::signin(State(state), Json(payload)).await.unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert!(!token.access_token.is_empty());
}

#[tokio::test]
async fn test_signin_accepts_email_identifier() {
    let repo = Arc::new(MockRepo::default());
    let mut user = user_fixture(OWNER_ID, "pioneer", "user");
    user.password_hash = hash_password("password123").unwrap();
    repo.seed_user(user);
    let state = test_state(repo);

    let payload = LoginRequest {
        username_or_email: "pioneer@example.com".to_string(),
        password: "password123".to_string(),
    };

    assert!(auth::signin(State(state), Json(payload)).await.is_ok());
}

#[tokio::test]
async fn test_signin_rejects_wrong_password() {
    let repo = Arc::new(MockRepo::default());
    let mut user = user_fixture(OWNER_ID, "pioneer", "user");
    user.password_hash = hash_password("password123").unwrap();
    repo.seed_user(user);
    let state = test_state(repo);

    let payload = LoginRequest {
        username_or_email: "pioneer".to_string(),
        password: "wrong-password".to_string(),
    };
    let err = auth::signin(State(state), Json(payload)).await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "Invalid username/email or password");
}

#[tokio::test]
async fn test_signin_rejects_unknown_identity() {
    let state = test_state(Arc::new(MockRepo::default()));

    let payload = LoginRequest {
        username_or_email: "ghost".to_string(),
        password: "password123".to_string(),
    };
    let err = auth::signin(State(state), Json(payload)).await.unwrap_err();

    // Same message as a bad password so probes cannot tell accounts apart.
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.to_string(), "Invalid username/email or password");
}

// --- CURRENT USER AND AVAILABILITY ---

#[tokio::test]
async fn test_get_current_user_summary() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "user"));
    let state = test_state(repo);

    let Json(summary) = users::get_current_user(as_user(OWNER_ID), State(state))
        .await
        .unwrap();

    assert_eq!(summary.username, "pioneer");
}

#[tokio::test]
async fn test_username_availability_probe() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "taken", "user"));
    let state = test_state(repo);

    let Json(taken) = users::check_username_availability(
        State(state.clone()),
        Query(users::UsernameQuery {
            username: "Taken".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(!taken.available);

    let Json(free) = users::check_username_availability(
        State(state),
        Query(users::UsernameQuery {
            username: "free".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(free.available);
}

#[tokio::test]
async fn test_email_availability_probe() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "taken", "user"));
    let state = test_state(repo);

    let Json(taken) = users::check_email_availability(
        State(state),
        Query(users::EmailQuery {
            email: "Taken@Example.com".to_string(),
        }),
    )
    .await
    .unwrap();

    assert!(!taken.available);
}

#[tokio::test]
async fn test_user_profile_includes_post_count() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "prolific", "user"));
    repo.seed_post(post_fixture(1, OWNER_ID, 1));
    repo.seed_post(post_fixture(2, OWNER_ID, 1));
    repo.seed_post(post_fixture(3, OTHER_ID, 1));
    let state = test_state(repo);

    let Json(profile) = users::get_user_profile(State(state), Path("prolific".to_string()))
        .await
        .unwrap();

    assert_eq!(profile.username, "prolific");
    assert_eq!(profile.post_count, 2);
}

#[tokio::test]
async fn test_user_profile_unknown_username() {
    let state = test_state(Arc::new(MockRepo::default()));

    let err = users::get_user_profile(State(state), Path("ghost".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "User not found with username : 'ghost'");
}

// --- ACCOUNT MANAGEMENT ---

#[tokio::test]
async fn test_add_user_requires_admin() {
    let state = test_state(Arc::new(MockRepo::default()));

    let err = users::add_user(as_user(OWNER_ID), State(state), Json(signup_request("newbie")))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
}

#[tokio::test]
async fn test_add_user_as_admin_creates_regular_user() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(ADMIN_ID, "boss", "admin"));
    let state = test_state(repo);

    let (status, Json(user)) =
        users::add_user(as_admin(ADMIN_ID), State(state), Json(signup_request("newbie")))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    // No first-account promotion on the admin path.
    assert_eq!(user.role, "user");
}

#[tokio::test]
async fn test_update_user_self() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "user"));
    let state = test_state(repo);

    let payload = UpdateUserRequest {
        first_name: Some("Updated".to_string()),
        last_name: None,
        email: None,
        password: None,
    };
    let Json(user) = users::update_user(
        as_user(OWNER_ID),
        State(state),
        Path("pioneer".to_string()),
        Json(payload),
    )
    .await
    .unwrap();

    assert_eq!(user.first_name, "Updated");
    assert_eq!(user.last_name, "User");
}

#[tokio::test]
async fn test_update_user_forbidden_for_other_account() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "user"));
    let state = test_state(repo);

    let payload = UpdateUserRequest {
        first_name: Some("Hijacked".to_string()),
        last_name: None,
        email: None,
        password: None,
    };
    let err = users::update_user(
        as_user(OTHER_ID),
        State(state),
        Path("pioneer".to_string()),
        Json(payload),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
}

#[tokio::test]
async fn test_update_user_rejects_email_collision() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "user"));
    repo.seed_user(user_fixture(OTHER_ID, "occupant", "user"));
    let state = test_state(repo);

    let payload = UpdateUserRequest {
        first_name: None,
        last_name: None,
        email: Some("occupant@example.com".to_string()),
        password: None,
    };
    let err = users::update_user(
        as_user(OWNER_ID),
        State(state),
        Path("pioneer".to_string()),
        Json(payload),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Email is already taken");
}

#[tokio::test]
async fn test_delete_user_self() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "pioneer", "user"));
    let state = test_state(repo.clone());

    let Json(ack) = users::delete_user(as_user(OWNER_ID), State(state), Path("pioneer".to_string()))
        .await
        .unwrap();

    assert_eq!(ack.message, "You successfully deleted profile of: pioneer");
    assert!(repo.users.lock().unwrap().is_empty());
}

// --- ROLE MANAGEMENT ---

#[tokio::test]
async fn test_give_admin_promotes_user() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "growing", "user"));
    let state = test_state(repo.clone());

    let Json(ack) = users::give_admin(as_admin(ADMIN_ID), State(state), Path("growing".to_string()))
        .await
        .unwrap();

    assert_eq!(ack.message, "You gave ADMIN role to user: growing");
    assert_eq!(repo.users.lock().unwrap()[0].role, "admin");
}

#[tokio::test]
async fn test_take_admin_demotes_user() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "shrinking", "admin"));
    let state = test_state(repo.clone());

    let Json(ack) =
        users::take_admin(as_admin(ADMIN_ID), State(state), Path("shrinking".to_string()))
            .await
            .unwrap();

    assert_eq!(ack.message, "You took ADMIN role from user: shrinking");
    assert_eq!(repo.users.lock().unwrap()[0].role, "user");
}

#[tokio::test]
async fn test_give_admin_requires_admin() {
    let repo = Arc::new(MockRepo::default());
    repo.seed_user(user_fixture(OWNER_ID, "growing", "user"));
    let state = test_state(repo);

    let err = users::give_admin(as_user(OTHER_ID), State(state), Path("growing".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
}
