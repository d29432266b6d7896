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
    models::{ApiResponse, Tag, TagRequest},
    pagination::{PagedResponse, PageParams},
};

/// get_all_tags
///
/// [Public Route] Alphabetical page of tags.
#[utoipa::path(
    get,
    path = "/api/tags",
    params(PageParams),
    responses((status = 200, description = "Page of tags", body = PagedResponse<Tag>))
)]
pub async fn get_all_tags(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Tag>>> {
    params.validate()?;

    let (tags, total) = state.repo.list_tags(params.limit(), params.offset()).await?;

    Ok(Json(PagedResponse::new(tags, &params, total)))
}

/// get_tag
///
/// [Public Route] Single tag by ID.
#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Found", body = Tag),
        (status = 404, description = "Unknown tag", body = ApiResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tag>> {
    let tag = state
        .repo
        .get_tag(id)
        .await?
        .ok_or_else(|| not_found("Tag", "id", id))?;

    Ok(Json(tag))
}

/// add_tag
///
/// [Authenticated Route] Creates a tag attributed to the requesting user. Tag
/// names are unique; a duplicate comes back as a 400.
#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Created", body = Tag),
        (status = 400, description = "Name already exists", body = ApiResponse)
    )
)]
pub async fn add_tag(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<TagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    payload.validate()?;

    let tag = state.repo.create_tag(user_id, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// update_tag
///
/// [Authenticated Route] Renames a tag. Creator or admin only.
#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Updated", body = Tag),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 404, description = "Unknown tag", body = ApiResponse)
    )
)]
pub async fn update_tag(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TagRequest>,
) -> ApiResult<Json<Tag>> {
    payload.validate()?;

    let existing = state
        .repo
        .get_tag(id)
        .await?
        .ok_or_else(|| not_found("Tag", "id", id))?;

    if existing.created_by != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let tag = state
        .repo
        .update_tag(id, &payload.name)
        .await?
        .ok_or_else(|| not_found("Tag", "id", id))?;

    Ok(Json(tag))
}

/// delete_tag
///
/// [Authenticated Route] Removes a tag and its post links. Creator or admin
/// only.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 404, description = "Unknown tag", body = ApiResponse)
    )
)]
pub async fn delete_tag(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = state
        .repo
        .get_tag(id)
        .await?
        .ok_or_else(|| not_found("Tag", "id", id))?;

    if existing.created_by != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_tag(id).await?;

    Ok(Json(ApiResponse::ok("You successfully deleted tag")))
}
