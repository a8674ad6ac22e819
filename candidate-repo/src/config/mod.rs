//! Configuration loading.
//!
//! Defaults such as the owning organization and the template repository
//! live in an optional TOML file rather than in the binary:
//!
//! ```toml
//! [defaults]
//! owner = "acme-hiring"
//! template = "acme-hiring/take-home"
//! invite = true
//!
//! [hosting]
//! api-base = "https://api.github.com"
//! git-base = "https://github.com"
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{DefaultSettings, HostingSettings, Settings};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "candidate-repo.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "CANDIDATE_REPO_CONFIG";

/// Loads settings from the first available source.
///
/// Lookup order:
/// 1. `explicit`, when given
/// 2. the path in [`CONFIG_ENV_VAR`]
/// 3. [`DEFAULT_CONFIG_FILE`] in the working directory, if present
///
/// Without any file, built-in defaults are returned.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if an explicitly named file (1 or 2)
/// does not exist, or any error from [`Settings::load`].
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }
        info!(path = %path.display(), "Using config file");
        return Settings::load(&path);
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        info!(path = %local.display(), "Using config file");
        return Settings::load(local);
    }

    debug!("No config file found, using built-in defaults");
    Ok(Settings::default())
}
