//! One-time startup seeding of the bundled example events.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::EntityName;
use crate::domain::EventDraft;
use crate::domain::ports::{EventRepository, EventRepositoryError, SeedingResult};
use crate::settings::AppSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    #[error("failed to read seed fixture at {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed fixture at {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("event seeding failed: {0}")]
    Seeding(#[from] EventRepositoryError),
}

#[derive(Deserialize)]
struct SeedEvent {
    name: EntityName,
    location: EntityName,
    category: EntityName,
}

impl From<SeedEvent> for EventDraft {
    fn from(value: SeedEvent) -> Self {
        EventDraft::new(value.name, value.location, value.category)
    }
}

/// Parse a JSON array of `{name, location, category}` objects.
pub fn parse_seed_events(contents: &str) -> Result<Vec<EventDraft>, serde_json::Error> {
    let rows: Vec<SeedEvent> = serde_json::from_str(contents)?;
    Ok(rows.into_iter().map(EventDraft::from).collect())
}

/// Read and parse the seed fixture at `path`.
pub fn load_seed_events(path: &Path) -> Result<Vec<EventDraft>, StartupSeedingError> {
    let read_error = |source| StartupSeedingError::FixtureRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    parse_seed_events(&contents).map_err(|source| StartupSeedingError::FixtureParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Seed the store when enabled. Returns `None` when seeding is switched off.
pub async fn seed_events_on_startup(
    settings: &AppSettings,
    events: &dyn EventRepository,
) -> Result<Option<SeedingResult>, StartupSeedingError> {
    if !settings.seed_enabled {
        info!(reason = "disabled", "event seeding skipped");
        return Ok(None);
    }

    let path = settings.seed_path();
    let drafts = load_seed_events(&path)?;
    let result = events.seed_if_empty(&drafts).await?;
    match result {
        SeedingResult::Applied { inserted } => {
            info!(path = %path.display(), inserted, "example events seeded");
        }
        SeedingResult::AlreadySeeded => {
            info!(path = %path.display(), "store already holds events; seeding skipped");
        }
    }
    Ok(Some(result))
}
