//! Configuration module for storefront-client
//!
//! Handles loading and validating settings from YAML files and environment variables.
//! Settings are passed explicitly into each component; there is no global instance.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "STOREFRONT_SETTINGS_PATH";

/// Candidate settings locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("storefront.yml"),
        PathBuf::from("config/storefront.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("storefront-client/storefront.yml"));
    }
    paths
}

/// Load settings from an explicit path, the environment, the default paths,
/// or fall back to defaults. Environment overrides are applied last.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let env_path = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);

    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(env_path)
        .chain(default_paths());

    let mut settings = None;
    for path in candidates {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            settings = Some(Settings::from_file(&path)?);
            break;
        }
    }

    let mut settings = settings.unwrap_or_else(|| {
        info!("No settings file found, using defaults");
        Settings::default()
    });
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}
