use crate::api::{actors, health, movies};
use crate::models::{
    Actor, ActorListResponse, ActorPayload, ActorResponse, CreatedResponse, DeletedResponse,
    MovieListResponse, MoviePayload, MovieResponse, MovieView,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub(crate) const HOME_TAG: &str = "Home";
pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const MOVIES_TAG: &str = "Movies API";
pub(crate) const ACTORS_TAG: &str = "Actors API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::home,
        health::health_check,
        health::ready_check,
        movies::list_movies,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        actors::list_actors,
        actors::get_actor,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
    ),
    components(schemas(
        Actor,
        ActorPayload,
        ActorResponse,
        ActorListResponse,
        MovieView,
        MoviePayload,
        MovieResponse,
        MovieListResponse,
        CreatedResponse,
        DeletedResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = HOME_TAG, description = "Routing check"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = MOVIES_TAG, description = "Movie catalog, guarded by *:movies permissions"),
        (name = ACTORS_TAG, description = "Actor catalog, guarded by *:actors permissions"),
    ),
    info(
        title = "Casting Agency API",
        description = "Movies and actors behind permission-checked bearer tokens",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Declares the bearer token scheme referenced by the protected routes
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
