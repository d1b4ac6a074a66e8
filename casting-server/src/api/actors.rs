use crate::api::parse_object;
use crate::errors::ApiError;
use crate::models::{
    ActorListResponse, ActorPayload, ActorResponse, CreatedResponse, DeletedResponse,
};
use crate::openapi::ACTORS_TAG;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use casting_auth::ClaimSet;
use log::info;

#[utoipa::path(
    get,
    path = "/actors",
    tag = ACTORS_TAG,
    security(("bearer" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors, ordered by id", body = ActorListResponse),
        (status = 401, description = "Missing or expired token"),
        (status = 403, description = "Token lacks get:actors")
    )
)]
pub(crate) async fn list_actors(State(state): State<AppState>) -> Json<ActorListResponse> {
    Json(ActorListResponse {
        success: true,
        actors: state.store.list_actors().await,
    })
}

#[utoipa::path(
    get,
    path = "/actors/{id}",
    tag = ACTORS_TAG,
    security(("bearer" = ["get:actors"])),
    params(("id" = u64, Path, description = "Actor id")),
    responses(
        (status = 200, description = "The actor", body = ActorResponse),
        (status = 404, description = "No such actor")
    )
)]
pub(crate) async fn get_actor(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ActorResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let actor = state.store.get_actor(id).await?;
    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

#[utoipa::path(
    post,
    path = "/actors",
    tag = ACTORS_TAG,
    security(("bearer" = ["post:actors"])),
    request_body = ActorPayload,
    responses(
        (status = 200, description = "Actor created", body = CreatedResponse),
        (status = 400, description = "Missing name, age or gender"),
        (status = 422, description = "Body is not a JSON object")
    )
)]
pub(crate) async fn create_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    body: Bytes,
) -> Result<Json<CreatedResponse>, ApiError> {
    let payload: ActorPayload = parse_object(&body)?;
    let actor = payload.into_new().ok_or_else(ApiError::bad_request)?;

    let id = state.store.insert_actor(actor).await?;
    info!("Actor {} created by {:?}", id, claims.subject);
    Ok(Json(CreatedResponse {
        success: true,
        created: id,
    }))
}

#[utoipa::path(
    patch,
    path = "/actors/{id}",
    tag = ACTORS_TAG,
    security(("bearer" = ["patch:actors"])),
    params(("id" = u64, Path, description = "Actor id")),
    request_body = ActorPayload,
    responses(
        (status = 200, description = "The updated actor", body = ActorResponse),
        (status = 400, description = "No field to update"),
        (status = 404, description = "No such actor"),
        (status = 422, description = "Body is not a JSON object")
    )
)]
pub(crate) async fn update_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<ActorResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let payload: ActorPayload = parse_object(&body)?;
    let patch = payload.into_patch().ok_or_else(ApiError::bad_request)?;

    let actor = state.store.update_actor(id, patch).await?;
    info!("Actor {} updated by {:?}", id, claims.subject);
    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

/// Deleting an actor also removes them from every movie cast
#[utoipa::path(
    delete,
    path = "/actors/{id}",
    tag = ACTORS_TAG,
    security(("bearer" = ["delete:actors"])),
    params(("id" = u64, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Actor deleted", body = DeletedResponse),
        (status = 404, description = "No such actor")
    )
)]
pub(crate) async fn delete_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found())?;
    let deleted = state.store.delete_actor(id).await?;
    info!("Actor {} deleted by {:?}", deleted, claims.subject);
    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_actor_lifecycle() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&["get:actors", "post:actors", "patch:actors", "delete:actors"]);

        let created = fixture
            .post(
                "/actors",
                &token,
                &json!({"name": "Lena Ortiz", "age": 31, "gender": "female"}),
            )
            .await;
        created.assert_ok();
        assert_eq!(created.json["created"], 1);

        let patched = fixture
            .patch("/actors/1", &token, &json!({"age": 32}))
            .await;
        patched.assert_ok();
        assert_eq!(
            patched.json,
            json!({
                "success": true,
                "actor": {"id": 1, "name": "Lena Ortiz", "age": 32, "gender": "female"},
            })
        );

        let listed = fixture.get("/actors", &token).await;
        listed.assert_ok();
        assert_eq!(listed.json["actors"].as_array().map(Vec::len), Some(1));

        fixture.delete("/actors/1", &token).await.assert_ok();
        fixture
            .get("/actors/1", &token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleting_actor_updates_movie_casts() {
        let fixture = TestFixture::new().await;
        fixture.seed_demo().await;
        let token = fixture.token(&["get:movies", "delete:actors"]);

        let before = fixture.get("/movies/1", &token).await;
        assert_eq!(
            before.json["movie"]["actors"],
            json!(["Margot Keller", "Daniel Osei"])
        );

        fixture.delete("/actors/1", &token).await.assert_ok();

        let after = fixture.get("/movies/1", &token).await;
        assert_eq!(after.json["movie"]["actors"], json!(["Daniel Osei"]));
    }

    #[tokio::test]
    async fn test_create_actor_with_invalid_age() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&["post:actors"]);

        fixture
            .post(
                "/actors",
                &token,
                &json!({"name": "Kid", "age": "twelve", "gender": "male"}),
            )
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_missing_actor() {
        let fixture = TestFixture::new().await;
        let token = fixture.token(&["delete:actors"]);

        let response = fixture.delete("/actors/41", &token).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }
}
