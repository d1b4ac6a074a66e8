use super::{CatalogStore, StoreError};
use crate::models::{NewActor, NewMovie};
use chrono::NaiveDate;
use log::info;

const ACTORS: &[(&str, u32, &str)] = &[
    ("Margot Keller", 34, "female"),
    ("Daniel Osei", 41, "male"),
    ("Priya Raman", 29, "female"),
    ("Tomas Lindqvist", 52, "male"),
    ("Aiko Tanaka", 38, "female"),
    ("Rafael Duarte", 45, "male"),
];

// Casts index into ACTORS, in insertion order
const MOVIES: &[(&str, (i32, u32, u32), &[usize])] = &[
    ("The Quiet Harbor", (2019, 3, 8), &[0, 1]),
    ("Northern Lights", (2021, 11, 19), &[2, 3, 4]),
    ("Paper Kingdoms", (2023, 6, 2), &[5, 0]),
];

/// Loads a small fixed catalog. Running it twice inserts the catalog twice.
pub async fn seed_demo_data(store: &dyn CatalogStore) -> Result<(), StoreError> {
    let mut actor_ids = Vec::with_capacity(ACTORS.len());
    for (name, age, gender) in ACTORS {
        let id = store
            .insert_actor(NewActor {
                name: name.to_string(),
                age: *age,
                gender: gender.to_string(),
            })
            .await?;
        actor_ids.push(id);
    }

    for (title, (year, month, day), cast) in MOVIES {
        let Some(release_date) = NaiveDate::from_ymd_opt(*year, *month, *day) else {
            continue;
        };
        store
            .insert_movie(NewMovie {
                title: title.to_string(),
                release_date,
                actors: cast.iter().filter_map(|i| actor_ids.get(*i).copied()).collect(),
            })
            .await?;
    }

    info!(
        "Seeded demo catalog with {} actors and {} movies",
        ACTORS.len(),
        MOVIES.len()
    );
    Ok(())
}
