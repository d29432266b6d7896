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
    models::{ApiResponse, Category, CategoryRequest},
    pagination::{PagedResponse, PageParams},
};

/// get_all_categories
///
/// [Public Route] Alphabetical page of categories.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(PageParams),
    responses((status = 200, description = "Page of categories", body = PagedResponse<Category>))
)]
pub async fn get_all_categories(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Category>>> {
    params.validate()?;

    let (categories, total) = state
        .repo
        .list_categories(params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(categories, &params, total)))
}

/// get_category
///
/// [Public Route] Single category by ID.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Found", body = Category),
        (status = 404, description = "Unknown category", body = ApiResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = state
        .repo
        .get_category(id)
        .await?
        .ok_or_else(|| not_found("Category", "id", id))?;

    Ok(Json(category))
}

/// add_category
///
/// [Authenticated Route] Creates a category attributed to the requesting
/// user. Names are unique; a duplicate comes back as a 400.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Name already exists", body = ApiResponse)
    )
)]
pub async fn add_category(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    payload.validate()?;

    let category = state.repo.create_category(user_id, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// update_category
///
/// [Authenticated Route] Renames a category. Creator or admin only.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 404, description = "Unknown category", body = ApiResponse)
    )
)]
pub async fn update_category(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    payload.validate()?;

    let existing = state
        .repo
        .get_category(id)
        .await?
        .ok_or_else(|| not_found("Category", "id", id))?;

    if existing.created_by != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let category = state
        .repo
        .update_category(id, &payload.name)
        .await?
        .ok_or_else(|| not_found("Category", "id", id))?;

    Ok(Json(category))
}

/// delete_category
///
/// [Authenticated Route] Removes a category together with the posts filed
/// under it (cascade). Creator or admin only.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 404, description = "Unknown category", body = ApiResponse)
    )
)]
pub async fn delete_category(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = state
        .repo
        .get_category(id)
        .await?
        .ok_or_else(|| not_found("Category", "id", id))?;

    if existing.created_by != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_category(id).await?;

    Ok(Json(ApiResponse::ok("You successfully deleted category")))
}
