use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult, not_found},
    models::{ApiResponse, PostRequest, PostResponse},
    pagination::{PagedResponse, PageParams},
};

/// get_all_posts
///
/// [Public Route] Newest-first page of all posts, tags included.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(PageParams),
    responses((status = 200, description = "Page of posts", body = PagedResponse<PostResponse>))
)]
pub async fn get_all_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<PostResponse>>> {
    params.validate()?;

    let (posts, total) = state
        .repo
        .list_posts(params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(posts, &params, total)))
}

/// get_posts_by_category
///
/// [Public Route] Page of posts filed under one category. The category itself
/// must exist, otherwise the response is a 404 rather than an empty page.
#[utoipa::path(
    get,
    path = "/api/posts/category/{id}",
    params(("id" = i64, Path, description = "Category ID"), PageParams),
    responses(
        (status = 200, description = "Page of posts", body = PagedResponse<PostResponse>),
        (status = 404, description = "Unknown category", body = ApiResponse)
    )
)]
pub async fn get_posts_by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<PostResponse>>> {
    params.validate()?;

    state
        .repo
        .get_category(id)
        .await?
        .ok_or_else(|| not_found("Category", "id", id))?;

    let (posts, total) = state
        .repo
        .list_posts_by_category(id, params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(posts, &params, total)))
}

/// get_posts_by_tag
///
/// [Public Route] Page of posts carrying one tag.
#[utoipa::path(
    get,
    path = "/api/posts/tag/{id}",
    params(("id" = i64, Path, description = "Tag ID"), PageParams),
    responses(
        (status = 200, description = "Page of posts", body = PagedResponse<PostResponse>),
        (status = 404, description = "Unknown tag", body = ApiResponse)
    )
)]
pub async fn get_posts_by_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<PostResponse>>> {
    params.validate()?;

    state
        .repo
        .get_tag(id)
        .await?
        .ok_or_else(|| not_found("Tag", "id", id))?;

    let (posts, total) = state
        .repo
        .list_posts_by_tag(id, params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(posts, &params, total)))
}

/// get_post
///
/// [Public Route] Single post by ID.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = PostResponse),
        (status = 404, description = "Unknown post", body = ApiResponse)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .repo
        .get_post(id)
        .await?
        .ok_or_else(|| not_found("Post", "id", id))?;

    Ok(Json(post))
}

/// add_post
///
/// [Authenticated Route] Creates a post owned by the requesting user. The
/// category must already exist; tag names that don't are created on the fly.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Created", body = PostResponse),
        (status = 404, description = "Unknown category", body = ApiResponse)
    )
)]
pub async fn add_post(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    payload.validate()?;

    state
        .repo
        .get_category(payload.category_id)
        .await?
        .ok_or_else(|| not_found("Category", "id", payload.category_id))?;

    let post = state.repo.create_post(user_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// update_post
///
/// [Authenticated Route] Full replace of a post, tag set included.
///
/// *Authorization*: The post is fetched first; a missing post is a 404, a
/// caller who is neither the owner nor an admin gets a 403 before anything
/// is written.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated", body = PostResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown post or category", body = ApiResponse)
    )
)]
pub async fn update_post(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PostRequest>,
) -> ApiResult<Json<PostResponse>> {
    payload.validate()?;

    let existing = state
        .repo
        .get_post(id)
        .await?
        .ok_or_else(|| not_found("Post", "id", id))?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state
        .repo
        .get_category(payload.category_id)
        .await?
        .ok_or_else(|| not_found("Category", "id", payload.category_id))?;

    let post = state
        .repo
        .update_post(id, &payload)
        .await?
        .ok_or_else(|| not_found("Post", "id", id))?;

    Ok(Json(post))
}

/// delete_post
///
/// [Authenticated Route] Deletes a post and, via cascade, its comments and
/// tag links. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown post", body = ApiResponse)
    )
)]
pub async fn delete_post(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = state
        .repo
        .get_post(id)
        .await?
        .ok_or_else(|| not_found("Post", "id", id))?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_post(id).await?;

    Ok(Json(ApiResponse::ok("You successfully deleted post")))
}
