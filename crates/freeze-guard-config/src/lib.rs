//! Configuration for the service freeze merge guard
//!
//! Settings are read from `freeze-guard.toml` (current directory first, then
//! the user config directory) and can be overridden from the environment or a
//! `.env` file.

mod settings;

pub use settings::{
    ConfigurationMissing, Credentials, Settings, SettingsStore, API_KEY_KEY, ORGANIZATION_KEY,
};

use std::path::PathBuf;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "freeze-guard.toml";

/// Candidate locations for the configuration file, in lookup order
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("freeze-guard").join(CONFIG_FILE_NAME));
    }
    candidates
}

/// Read the first configuration file found, if any
pub fn load_config_file() -> Option<String> {
    for path in config_file_candidates() {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("Reading config from {}", path.display());
                return Some(content);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                log::warn!("Failed to read config file {}: {}", path.display(), e);
            }
        }
    }
    None
}
