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
    models::{ApiResponse, Photo, PhotoRequest},
    pagination::{PagedResponse, PageParams},
};

/// get_all_photos
///
/// [Public Route] Newest-first page of photos across all albums.
#[utoipa::path(
    get,
    path = "/api/photos",
    params(PageParams),
    responses((status = 200, description = "Page of photos", body = PagedResponse<Photo>))
)]
pub async fn get_all_photos(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Photo>>> {
    params.validate()?;

    let (photos, total) = state
        .repo
        .list_photos(params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(photos, &params, total)))
}

/// get_photo
///
/// [Public Route] Single photo by ID.
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Found", body = Photo),
        (status = 404, description = "Unknown photo", body = ApiResponse)
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Photo>> {
    let photo = state
        .repo
        .get_photo(id)
        .await?
        .ok_or_else(|| not_found("Photo", "id", id))?;

    Ok(Json(photo))
}

/// add_photo
///
/// [Authenticated Route] Adds a photo to an album. A photo has no owner
/// column of its own: whoever owns the album owns the photo, so the album is
/// authorized before the insert.
#[utoipa::path(
    post,
    path = "/api/photos",
    request_body = PhotoRequest,
    responses(
        (status = 201, description = "Created", body = Photo),
        (status = 403, description = "Album belongs to someone else", body = ApiResponse),
        (status = 404, description = "Unknown album", body = ApiResponse)
    )
)]
pub async fn add_photo(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PhotoRequest>,
) -> ApiResult<(StatusCode, Json<Photo>)> {
    payload.validate()?;

    let album = state
        .repo
        .get_album(payload.album_id)
        .await?
        .ok_or_else(|| not_found("Album", "id", payload.album_id))?;

    if album.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let photo = state.repo.create_photo(&payload).await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

/// update_photo
///
/// [Authenticated Route] Full replace of a photo. Moving it to another album
/// requires authorization on both the current and the target album.
#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    request_body = PhotoRequest,
    responses(
        (status = 200, description = "Updated", body = Photo),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown photo or album", body = ApiResponse)
    )
)]
pub async fn update_photo(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PhotoRequest>,
) -> ApiResult<Json<Photo>> {
    payload.validate()?;

    let existing = state
        .repo
        .get_photo(id)
        .await?
        .ok_or_else(|| not_found("Photo", "id", id))?;

    let album = state
        .repo
        .get_album(existing.album_id)
        .await?
        .ok_or_else(|| not_found("Album", "id", existing.album_id))?;

    if album.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    if payload.album_id != existing.album_id {
        let target = state
            .repo
            .get_album(payload.album_id)
            .await?
            .ok_or_else(|| not_found("Album", "id", payload.album_id))?;

        if target.user_id != user_id && role != "admin" {
            return Err(ApiError::Forbidden);
        }
    }

    let photo = state
        .repo
        .update_photo(id, &payload)
        .await?
        .ok_or_else(|| not_found("Photo", "id", id))?;

    Ok(Json(photo))
}

/// delete_photo
///
/// [Authenticated Route] Removes a photo. Authorized through its album.
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    params(("id" = i64, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown photo", body = ApiResponse)
    )
)]
pub async fn delete_photo(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = state
        .repo
        .get_photo(id)
        .await?
        .ok_or_else(|| not_found("Photo", "id", id))?;

    let album = state
        .repo
        .get_album(existing.album_id)
        .await?
        .ok_or_else(|| not_found("Album", "id", existing.album_id))?;

    if album.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_photo(id).await?;

    Ok(Json(ApiResponse::ok("Photo deleted successfully")))
}
