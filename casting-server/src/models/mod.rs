use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored actor
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Actor {
    /// Unique identifier, assigned on creation
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// A stored movie; the cast is kept as actor ids
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub release_date: NaiveDate,
    pub actors: Vec<u64>,
}

/// A movie as returned by the API, with its cast rendered by name
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct MovieView {
    /// Unique identifier, assigned on creation
    pub id: u64,
    pub title: String,
    /// Release date as `YYYY-MM-DD`
    pub release_date: NaiveDate,
    /// Names of the cast members
    pub actors: Vec<String>,
}

/// Validated input for a new movie
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
    pub actors: Vec<u64>,
}

/// Validated partial update of a movie; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub actors: Option<Vec<u64>>,
}

/// Validated input for a new actor
#[derive(Debug, Clone, PartialEq)]
pub struct NewActor {
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// Validated partial update of an actor; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// Movie fields accepted by `POST /movies` and `PATCH /movies/{id}`
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct MoviePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Release date as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Ids of existing actors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<u64>>,
}

impl MoviePayload {
    /// Title and release date are required; the cast defaults to empty
    pub fn into_new(self) -> Option<NewMovie> {
        Some(NewMovie {
            title: non_blank(self.title)?,
            release_date: self.release_date?,
            actors: self.actors.unwrap_or_default(),
        })
    }

    /// At least one field must be present; a present title must not be blank
    pub fn into_patch(self) -> Option<MoviePatch> {
        if self.title.is_none() && self.release_date.is_none() && self.actors.is_none() {
            return None;
        }
        let title = match self.title {
            Some(title) => Some(non_blank(Some(title))?),
            None => None,
        };
        Some(MoviePatch {
            title,
            release_date: self.release_date,
            actors: self.actors,
        })
    }
}

/// Actor fields accepted by `POST /actors` and `PATCH /actors/{id}`
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ActorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ActorPayload {
    /// Every field is required
    pub fn into_new(self) -> Option<NewActor> {
        Some(NewActor {
            name: non_blank(self.name)?,
            age: self.age?,
            gender: non_blank(self.gender)?,
        })
    }

    /// At least one field must be present; present strings must not be blank
    pub fn into_patch(self) -> Option<ActorPatch> {
        if self.name.is_none() && self.age.is_none() && self.gender.is_none() {
            return None;
        }
        let name = match self.name {
            Some(name) => Some(non_blank(Some(name))?),
            None => None,
        };
        let gender = match self.gender {
            Some(gender) => Some(non_blank(Some(gender))?),
            None => None,
        };
        Some(ActorPatch {
            name,
            age: self.age,
            gender,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// `{"success": true, "movies": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<MovieView>,
}

/// `{"success": true, "movie": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieView,
}

/// `{"success": true, "actors": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

/// `{"success": true, "actor": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

/// `{"success": true, "created": id}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: u64,
}

/// `{"success": true, "deleted": id}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: u64,
}
