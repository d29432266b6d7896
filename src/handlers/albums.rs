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
    models::{Album, AlbumRequest, ApiResponse, Photo},
    pagination::{PagedResponse, PageParams},
};

/// get_all_albums
///
/// [Public Route] Newest-first page of albums. Photos are not embedded; the
/// dedicated photos listing below serves them.
#[utoipa::path(
    get,
    path = "/api/albums",
    params(PageParams),
    responses((status = 200, description = "Page of albums", body = PagedResponse<Album>))
)]
pub async fn get_all_albums(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Album>>> {
    params.validate()?;

    let (albums, total) = state
        .repo
        .list_albums(params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(albums, &params, total)))
}

/// get_album
///
/// [Public Route] Single album by ID.
#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Found", body = Album),
        (status = 404, description = "Unknown album", body = ApiResponse)
    )
)]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Album>> {
    let album = state
        .repo
        .get_album(id)
        .await?
        .ok_or_else(|| not_found("Album", "id", id))?;

    Ok(Json(album))
}

/// get_album_photos
///
/// [Public Route] Page of photos inside one album.
#[utoipa::path(
    get,
    path = "/api/albums/{id}/photos",
    params(("id" = i64, Path, description = "Album ID"), PageParams),
    responses(
        (status = 200, description = "Page of photos", body = PagedResponse<Photo>),
        (status = 404, description = "Unknown album", body = ApiResponse)
    )
)]
pub async fn get_album_photos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PagedResponse<Photo>>> {
    params.validate()?;

    state
        .repo
        .get_album(id)
        .await?
        .ok_or_else(|| not_found("Album", "id", id))?;

    let (photos, total) = state
        .repo
        .list_photos_by_album(id, params.limit(), params.offset())
        .await?;

    Ok(Json(PagedResponse::new(photos, &params, total)))
}

/// add_album
///
/// [Authenticated Route] Creates an album owned by the requesting user.
#[utoipa::path(
    post,
    path = "/api/albums",
    request_body = AlbumRequest,
    responses((status = 201, description = "Created", body = Album))
)]
pub async fn add_album(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AlbumRequest>,
) -> ApiResult<(StatusCode, Json<Album>)> {
    payload.validate()?;

    let album = state.repo.create_album(user_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(album)))
}

/// update_album
///
/// [Authenticated Route] Renames an album. Owner or admin only.
#[utoipa::path(
    put,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    request_body = AlbumRequest,
    responses(
        (status = 200, description = "Updated", body = Album),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown album", body = ApiResponse)
    )
)]
pub async fn update_album(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AlbumRequest>,
) -> ApiResult<Json<Album>> {
    payload.validate()?;

    let existing = state
        .repo
        .get_album(id)
        .await?
        .ok_or_else(|| not_found("Album", "id", id))?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    let album = state
        .repo
        .update_album(id, &payload)
        .await?
        .ok_or_else(|| not_found("Album", "id", id))?;

    Ok(Json(album))
}

/// delete_album
///
/// [Authenticated Route] Deletes an album and, via cascade, every photo in
/// it. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    params(("id" = i64, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown album", body = ApiResponse)
    )
)]
pub async fn delete_album(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    let existing = state
        .repo
        .get_album(id)
        .await?
        .ok_or_else(|| not_found("Album", "id", id))?;

    if existing.user_id != user_id && role != "admin" {
        return Err(ApiError::Forbidden);
    }

    state.repo.delete_album(id).await?;

    Ok(Json(ApiResponse::ok("You successfully deleted album")))
}
