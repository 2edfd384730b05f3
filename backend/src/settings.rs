//! Application settings loaded via OrthoConfig.
//!
//! Every field can come from `EVENTS_*` environment variables or the
//! matching command-line flag.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

fn default_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("seed-events.json")
}

/// Server and startup settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Items per list page.
    pub page_size: Option<u32>,
    /// Insert the bundled example events when the store is empty.
    #[ortho_config(default = true)]
    pub seed_enabled: bool,
    /// Override for the seed fixture file.
    pub seed_path: Option<PathBuf>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Page size, falling back to the default for absent or zero values.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn seed_path(&self) -> PathBuf {
        self.seed_path.clone().unwrap_or_else(default_seed_path)
    }
}
