use crate::models::{Actor, ActorPatch, MoviePatch, MovieView, NewActor, NewMovie};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod seed;

/// Errors that can occur during catalog operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("Actor {0} does not exist")]
    UnknownActor(u64),
}

/// Storage for the movie and actor catalog.
///
/// Ids are assigned by the store and never reused. Listings are ordered by id.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_movies(&self) -> Vec<MovieView>;

    async fn get_movie(&self, id: u64) -> Result<MovieView, StoreError>;

    /// Fails with [`StoreError::UnknownActor`] if the cast names a missing actor
    async fn insert_movie(&self, movie: NewMovie) -> Result<u64, StoreError>;

    async fn update_movie(&self, id: u64, patch: MoviePatch) -> Result<MovieView, StoreError>;

    async fn delete_movie(&self, id: u64) -> Result<u64, StoreError>;

    async fn list_actors(&self) -> Vec<Actor>;

    async fn get_actor(&self, id: u64) -> Result<Actor, StoreError>;

    async fn insert_actor(&self, actor: NewActor) -> Result<u64, StoreError>;

    async fn update_actor(&self, id: u64, patch: ActorPatch) -> Result<Actor, StoreError>;

    /// Also removes the actor from every movie cast
    async fn delete_actor(&self, id: u64) -> Result<u64, StoreError>;
}
