pub(crate) mod actors;
mod auth_middleware;
#[cfg(test)]
mod authorization_tests;
pub(crate) mod health;
pub(crate) mod movies;

use crate::api::auth_middleware::{authorization_middleware, RequiredPermission};
use crate::errors::ApiError;
use crate::openapi::HOME_TAG;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Permission strings each protected route demands
pub(crate) mod permission {
    pub const GET_MOVIES: &str = "get:movies";
    pub const POST_MOVIES: &str = "post:movies";
    pub const PATCH_MOVIES: &str = "patch:movies";
    pub const DELETE_MOVIES: &str = "delete:movies";
    pub const GET_ACTORS: &str = "get:actors";
    pub const POST_ACTORS: &str = "post:actors";
    pub const PATCH_ACTORS: &str = "patch:actors";
    pub const DELETE_ACTORS: &str = "delete:actors";
}

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .merge(health::router())
        .merge(protected_routes(state))
}

/// Creates the catalog routes; each method is guarded by its own permission
fn protected_routes(state: &AppState) -> Router<AppState> {
    use permission::*;

    // route_layer: a method that doesn't match answers 405 without demanding a token
    let requires = |permission: &'static str| {
        middleware::from_fn_with_state(
            RequiredPermission::new(state, permission),
            authorization_middleware,
        )
    };

    Router::new()
        .route(
            "/movies",
            get(movies::list_movies)
                .route_layer(requires(GET_MOVIES))
                .merge(post(movies::create_movie).route_layer(requires(POST_MOVIES))),
        )
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .route_layer(requires(GET_MOVIES))
                .merge(patch(movies::update_movie).route_layer(requires(PATCH_MOVIES)))
                .merge(delete(movies::delete_movie).route_layer(requires(DELETE_MOVIES))),
        )
        .route(
            "/actors",
            get(actors::list_actors)
                .route_layer(requires(GET_ACTORS))
                .merge(post(actors::create_actor).route_layer(requires(POST_ACTORS))),
        )
        .route(
            "/actors/{id}",
            get(actors::get_actor)
                .route_layer(requires(GET_ACTORS))
                .merge(patch(actors::update_actor).route_layer(requires(PATCH_ACTORS)))
                .merge(delete(actors::delete_actor).route_layer(requires(DELETE_ACTORS))),
        )
}

/// Liveness of the routing layer itself
#[utoipa::path(
    get,
    path = "/",
    tag = HOME_TAG,
    responses(
        (status = 200, description = "Routing works")
    )
)]
pub(crate) async fn home() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Route Working",
    }))
}

/// Parses a request body that must be a JSON object.
///
/// Anything that is not a JSON object is unprocessable (422); an object whose
/// fields have the wrong types is a bad request (400).
pub(crate) fn parse_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Request body is not JSON: {}", e);
        ApiError::unprocessable()
    })?;
    if !value.is_object() {
        return Err(ApiError::unprocessable());
    }
    serde_json::from_value(value).map_err(|e| {
        debug!("Request body has invalid fields: {}", e);
        ApiError::bad_request()
    })
}
