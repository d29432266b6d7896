use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult, bad_request, not_found},
    models::{ApiResponse, Comment, CommentRequest},
    pagination::{PagedResponse, PageParams},
};

/// get_all_comments
///
/// [Public Route] Newest-first page of comments under one post.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Post ID"), PageParams),
    responses(
        (status = 200, description = "Page of comments", body = PagedResponse<Comment>),
        (status = 404, description = "Unknown post", body = ApiResponse)
    )
)]
pub async fn get_all_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Comment>>> {
    params.validate()?;

    state
        .repo
        .get_post(post_id)
        .await?
        .ok_or_else(|| not_found("Post", "id", post_id))?;

    let (comments, total) = state
        .repo
        .list_comments(post_id, params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(comments, &params, total)))
}

/// add_comment
///
/// [Authenticated Route] Posts a comment under a post, owned by the caller.
#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Created", body = Comment),
        (status = 404, description = "Unknown post", body = ApiResponse)
    )
)]
pub async fn add_comment(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    payload.validate()?;

    state
        .repo
        .get_post(post_id)
        .await?
        .ok_or_else(|| not_found("Post", "id", post_id))?;

    let comment = state
        .repo
        .create_comment(post_id, user_id, &payload.body)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// get_comment
///
/// [Public Route] Single comment, addressed through its post. A comment that
/// exists but hangs off a different post is a 400, not a 404.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Found", body = Comment),
        (status = 400, description = "Comment belongs to another post", body = ApiResponse),
        (status = 404, description = "Unknown post or comment", body = ApiResponse)
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> ApiResult<Json<Comment>> {
    let comment = fetch_comment_of_post(&state, post_id, id).await?;

    Ok(Json(comment))
}

/// update_comment
///
/// [Authenticated Route] Rewrites a comment body. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated", body = Comment),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown post or comment", body = ApiResponse)
    )
)]
pub async fn update_comment(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<Json<Comment>> {
    payload.validate()?;

    let existing = fetch_comment_of_post(&state, post_id, id).await?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let comment = state
        .repo
        .update_comment(id, &payload.body)
        .await?
        .ok_or_else(|| not_found("Comment", "id", id))?;

    Ok(Json(comment))
}

/// delete_comment
///
/// [Authenticated Route] Removes a comment. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/comments/{id}",
    params(
        ("post_id" = i64, Path, description = "Post ID"),
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown post or comment", body = ApiResponse)
    )
)]
pub async fn delete_comment(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = fetch_comment_of_post(&state, post_id, id).await?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_comment(id).await?;

    Ok(Json(ApiResponse::ok("You successfully deleted comment")))
}

/// Resolves a comment addressed through its post: the post must exist (404),
/// the comment must exist (404) and must actually belong to that post (400).
async fn fetch_comment_of_post(
    state: &AppState,
    post_id: i64,
    id: i64,
) -> Result<Comment, ApiError> {
    state
        .repo
        .get_post(post_id)
        .await?
        .ok_or_else(|| not_found("Post", "id", post_id))?;

    let comment = state
        .repo
        .get_comment(id)
        .await?
        .ok_or_else(|| not_found("Comment", "id", id))?;

    if comment.post_id != post_id {
        return Err(bad_request("Comment does not belong to post"));
    }

    Ok(comment)
}
