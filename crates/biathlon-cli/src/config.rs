//! Race configuration loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use biathlon_core::RaceConfig;
use figment::Figment;
use figment::providers::{Env, Format, Json};

/// Environment prefix for configuration overrides (e.g. `BIATHLON_LAPS=3`).
pub const ENV_PREFIX: &str = "BIATHLON_";

/// Loads the race configuration from a JSON file, applying `BIATHLON_*`
/// environment overrides on top.
pub fn load_from(path: &Path) -> Result<RaceConfig> {
    if !path.is_file() {
        bail!("config file not found: {}", path.display());
    }

    Figment::new()
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .with_context(|| format!("failed to decode config {}", path.display()))
}
