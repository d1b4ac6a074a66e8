use super::{CatalogStore, StoreError};
use crate::models::{Actor, ActorPatch, Movie, MoviePatch, MovieView, NewActor, NewMovie};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Catalog {
    movies: BTreeMap<u64, Movie>,
    actors: BTreeMap<u64, Actor>,
    last_movie_id: u64,
    last_actor_id: u64,
}

impl Catalog {
    fn render(&self, movie: &Movie) -> MovieView {
        MovieView {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
            actors: movie
                .actors
                .iter()
                .filter_map(|id| self.actors.get(id))
                .map(|actor| actor.name.clone())
                .collect(),
        }
    }

    fn check_cast(&self, cast: &[u64]) -> Result<(), StoreError> {
        match cast.iter().find(|id| !self.actors.contains_key(id)) {
            Some(id) => Err(StoreError::UnknownActor(*id)),
            None => Ok(()),
        }
    }
}

/// Catalog held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn movie_not_found(id: u64) -> StoreError {
    StoreError::NotFound { kind: "Movie", id }
}

fn actor_not_found(id: u64) -> StoreError {
    StoreError::NotFound { kind: "Actor", id }
}

/// Drops repeated ids while keeping the first occurrence's position
fn dedup_cast(cast: Vec<u64>) -> Vec<u64> {
    let mut seen = Vec::with_capacity(cast.len());
    for id in cast {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_movies(&self) -> Vec<MovieView> {
        let catalog = self.catalog.read().await;
        catalog.movies.values().map(|m| catalog.render(m)).collect()
    }

    async fn get_movie(&self, id: u64) -> Result<MovieView, StoreError> {
        let catalog = self.catalog.read().await;
        catalog
            .movies
            .get(&id)
            .map(|m| catalog.render(m))
            .ok_or_else(|| movie_not_found(id))
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<u64, StoreError> {
        let mut catalog = self.catalog.write().await;
        catalog.check_cast(&movie.actors)?;

        catalog.last_movie_id += 1;
        let id = catalog.last_movie_id;
        catalog.movies.insert(
            id,
            Movie {
                id,
                title: movie.title,
                release_date: movie.release_date,
                actors: dedup_cast(movie.actors),
            },
        );
        Ok(id)
    }

    async fn update_movie(&self, id: u64, patch: MoviePatch) -> Result<MovieView, StoreError> {
        let mut catalog = self.catalog.write().await;
        if !catalog.movies.contains_key(&id) {
            return Err(movie_not_found(id));
        }
        if let Some(cast) = &patch.actors {
            catalog.check_cast(cast)?;
        }

        let movie = catalog
            .movies
            .get_mut(&id)
            .ok_or_else(|| movie_not_found(id))?;
        if let Some(title) = patch.title {
            movie.title = title;
        }
        if let Some(release_date) = patch.release_date {
            movie.release_date = release_date;
        }
        if let Some(cast) = patch.actors {
            movie.actors = dedup_cast(cast);
        }

        let movie = movie.clone();
        Ok(catalog.render(&movie))
    }

    async fn delete_movie(&self, id: u64) -> Result<u64, StoreError> {
        let mut catalog = self.catalog.write().await;
        catalog
            .movies
            .remove(&id)
            .map(|m| m.id)
            .ok_or_else(|| movie_not_found(id))
    }

    async fn list_actors(&self) -> Vec<Actor> {
        self.catalog.read().await.actors.values().cloned().collect()
    }

    async fn get_actor(&self, id: u64) -> Result<Actor, StoreError> {
        self.catalog
            .read()
            .await
            .actors
            .get(&id)
            .cloned()
            .ok_or_else(|| actor_not_found(id))
    }

    async fn insert_actor(&self, actor: NewActor) -> Result<u64, StoreError> {
        let mut catalog = self.catalog.write().await;
        catalog.last_actor_id += 1;
        let id = catalog.last_actor_id;
        catalog.actors.insert(
            id,
            Actor {
                id,
                name: actor.name,
                age: actor.age,
                gender: actor.gender,
            },
        );
        Ok(id)
    }

    async fn update_actor(&self, id: u64, patch: ActorPatch) -> Result<Actor, StoreError> {
        let mut catalog = self.catalog.write().await;
        let actor = catalog
            .actors
            .get_mut(&id)
            .ok_or_else(|| actor_not_found(id))?;
        if let Some(name) = patch.name {
            actor.name = name;
        }
        if let Some(age) = patch.age {
            actor.age = age;
        }
        if let Some(gender) = patch.gender {
            actor.gender = gender;
        }
        Ok(actor.clone())
    }

    async fn delete_actor(&self, id: u64) -> Result<u64, StoreError> {
        let mut catalog = self.catalog.write().await;
        let actor = catalog
            .actors
            .remove(&id)
            .ok_or_else(|| actor_not_found(id))?;
        for movie in catalog.movies.values_mut() {
            movie.actors.retain(|cast_id| *cast_id != id);
        }
        Ok(actor.id)
    }
}
