//! Course library API
//!
//! This example demonstrates:
//! - Loading media types and property mappings from YAML
//! - Paging, sorting, filtering and data shaping on `/api/authors`
//! - Full/friendly variants and links selected through the `Accept` header
//! - Creating authors, courses and author collections
//!
//! Run with `cargo run --example course_library` and try:
//!
//! ```text
//! curl -i 'http://localhost:3000/api/authors?orderBy=Name%20desc&pageSize=3'
//! curl -H 'Accept: application/vnd.marvin.hateoas+json' http://localhost:3000/api/authors
//! curl -H 'Accept: application/vnd.marvin.author.full+json' \
//!      'http://localhost:3000/api/authors?fields=id,firstName'
//! ```

use shaper::prelude::*;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "demos/course_library/config.yaml";

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid date {}-{}-{}", year, month, day))
}

fn seed() -> Result<(Vec<Author>, Vec<Course>)> {
    let authors = vec![
        Author::new("Berry", "Griffin Beak Eldritch", date(1650, 7, 23)?, "Ships"),
        Author::new("Nancy", "Swashbuckler Rye", date(1668, 5, 21)?, "Rum"),
        Author::new("Eli", "Ivory Bones Sweet", date(1701, 12, 16)?, "Singing"),
        Author::new("Arnold", "The Unseen Stafford", date(1702, 3, 6)?, "Singing"),
        Author::new("Seabury", "Toxic Reyson", date(1690, 11, 23)?, "Maps"),
        Author::new("Rutherford", "Fearless Cloven", date(1723, 4, 5)?, "General debauchery"),
        Author::new("Atherton", "Bloodthirsty Crossbones", date(1721, 10, 11)?, "Ships")
            .with_date_of_death(date(1760, 2, 3)?),
    ];

    let courses = vec![
        Course::new(
            authors[0].id,
            "Commandeering a Ship Without Getting Caught",
            Some("Commandeering a ship in rough waters isn't easy. Learn how to do it.".to_string()),
        ),
        Course::new(
            authors[0].id,
            "Overthrowing Mutiny",
            Some("In this course, the author provides tips to avoid mutinies.".to_string()),
        ),
        Course::new(
            authors[1].id,
            "Avoiding Brawling While Drinking as Much Rum as You Desire",
            Some("Every good pirate loves rum, but it also has a tendency to get you into trouble.".to_string()),
        ),
        Course::new(authors[2].id, "Singalong Pirate Hits", None),
    ];

    Ok((authors, courses))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shaper=debug")),
        )
        .init();

    let config = match ShaperConfig::from_yaml_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("could not load {}: {}; using defaults", CONFIG_PATH, e);
            ShaperConfig::default()
        }
    };
    let bind_address = config.bind_address.clone();

    let (authors, courses) = seed()?;
    tracing::info!(
        authors = authors.len(),
        courses = courses.len(),
        "seeded course library"
    );

    ServerBuilder::new()
        .with_config(config)
        .with_author_store(InMemoryStore::with_records(authors))
        .with_course_store(InMemoryStore::with_records(courses))
        .serve(&bind_address)
        .await
}
