//! Configuration file discovery

use std::path::{Path, PathBuf};

use mamabear_core::Config;

/// File name looked up in the standard locations
const CONFIG_FILE: &str = "mamabear.toml";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Standard configuration locations, in lookup order
///
/// The last entry lives in the platform config directory: `$XDG_CONFIG_HOME`
/// on Linux, `~/Library/Application Support` on macOS.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(CONFIG_FILE),
        PathBuf::from("/etc/mamabear").join(CONFIG_FILE),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mamabear").join(CONFIG_FILE));
    }
    paths
}

/// Load `explicit` if given, else the first existing candidate, else defaults
///
/// # Errors
/// Returns error if the chosen file cannot be read, parsed or validated
pub fn load(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
) -> eyre::Result<(Config, ConfigSource)> {
    if let Some(path) = explicit {
        let config = Config::load(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    for path in candidates {
        if path.exists() {
            let config = Config::load(path)?;
            return Ok((config, ConfigSource::File(path.clone())));
        }
    }

    Ok((Config::default(), ConfigSource::Defaults))
}

/// Apply command-line overrides and re-validate
///
/// # Errors
/// Returns error if an override makes the configuration invalid
pub fn apply_overrides(
    mut config: Config,
    backend_url: Option<String>,
    fleet_name: Option<String>,
) -> eyre::Result<Config> {
    if let Some(url) = backend_url {
        config.fleet.backend_url = url;
    }
    if let Some(name) = fleet_name {
        config.fleet.name = name;
    }
    config.validate()?;
    Ok(config)
}
