use crate::api::parse_object;
use crate::errors::ApiError;
use crate::models::{
    CreatedResponse, DeletedResponse, MovieListResponse, MoviePayload, MovieResponse,
};
use crate::openapi::MOVIES_TAG;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use casting_auth::ClaimSet;
use log::info;

#[utoipa::path(
    get,
    path = "/movies",
    tag = MOVIES_TAG,
    security(("bearer" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies, ordered by id", body = MovieListResponse),
        (status = 401, description = "Missing or expired token"),
        (status = 403, description = "Token lacks get:movies")
    )
)]
pub(crate) async fn list_movies(State(state): State<AppState>) -> Json<MovieListResponse> {
    Json(MovieListResponse {
        success: true,
        movies: state.store.list_movies().await,
    })
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    tag = MOVIES_TAG,
    security(("bearer" = ["get:movies"])),
    params(("id" = u64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieResponse),
        (status = 404, description = "No such movie")
    )
)]
pub(crate) async fn get_movie(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MovieResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let movie = state.store.get_movie(id).await?;
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = MOVIES_TAG,
    security(("bearer" = ["post:movies"])),
    request_body = MoviePayload,
    responses(
        (status = 200, description = "Movie created", body = CreatedResponse),
        (status = 400, description = "Missing title or release date, or unknown actor"),
        (status = 422, description = "Body is not a JSON object")
    )
)]
pub(crate) async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    body: Bytes,
) -> Result<Json<CreatedResponse>, ApiError> {
    let payload: MoviePayload = parse_object(&body)?;
    let movie = payload.into_new().ok_or_else(ApiError::bad_request)?;

    let id = state.store.insert_movie(movie).await?;
    info!("Movie {} created by {:?}", id, claims.subject);
    Ok(Json(CreatedResponse {
        success: true,
        created: id,
    }))
}

#[utoipa::path(
    patch,
    path = "/movies/{id}",
    tag = MOVIES_TAG,
    security(("bearer" = ["patch:movies"])),
    params(("id" = u64, Path, description = "Movie id")),
    request_body = MoviePayload,
    responses(
        (status = 200, description = "The updated movie", body = MovieResponse),
        (status = 400, description = "No field to update, or unknown actor"),
        (status = 404, description = "No such movie"),
        (status = 422, description = "Body is not a JSON object")
    )
)]
pub(crate) async fn update_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<MovieResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let payload: MoviePayload = parse_object(&body)?;
    let patch = payload.into_patch().ok_or_else(ApiError::bad_request)?;

    let movie = state.store.update_movie(id, patch).await?;
    info!("Movie {} updated by {:?}", id, claims.subject);
    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = MOVIES_TAG,
    security(("bearer" = ["delete:movies"])),
    params(("id" = u64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie deleted", body = DeletedResponse),
        (status = 404, description = "No such movie")
    )
)]
pub(crate) async fn delete_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let deleted = state.store.delete_movie(id).await?;
    info!("Movie {} deleted by {:?}", deleted, claims.subject);
    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}
