//! Config file loader.
//!
//! Reads the optional `config.toml` (`~/.jabrium/config.toml` unless a path
//! is given) into a [`ConfigLayer`] that sits beneath flags and environment
//! variables.

use std::path::{Path, PathBuf};

use jabrium_types::config::ConfigLayer;
use jabrium_types::error::ConfigError;

/// Default config path: `~/.jabrium/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".jabrium").join("config.toml"))
}

/// Load the config layer.
///
/// - An explicit `path` must exist and parse.
/// - Without one, the default path is used if present; a missing file yields
///   an empty layer.
/// - A file that exists but fails to parse is always an error.
pub async fn load_config_layer(path: Option<&Path>) -> Result<ConfigLayer, ConfigError> {
    let (config_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ConfigLayer::default()),
        },
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(ConfigLayer::default());
        }
        Err(err) => {
            return Err(ConfigError::File(format!(
                "failed to read {}: {err}",
                config_path.display()
            )));
        }
    };

    let layer = toml::from_str::<ConfigLayer>(&content).map_err(|err| {
        ConfigError::File(format!("failed to parse {}: {err}", config_path.display()))
    })?;

    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(layer)
}
