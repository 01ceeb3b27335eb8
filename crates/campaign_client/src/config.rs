use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "campaigns.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_url: String,
    pub store_key: Option<String>,
    pub collection: String,
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: "http://127.0.0.1:54321/rest/v1".into(),
            store_key: None,
            collection: "campaigns".into(),
            fetch_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    store_url: Option<String>,
    store_key: Option<String>,
    collection: Option<String>,
    fetch_timeout_secs: Option<u64>,
}

/// Defaults, then `path` if it exists, then the process environment.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings =
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            apply_file(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    apply_env(&mut settings, env);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.store_url {
        settings.store_url = v;
    }
    if let Some(v) = file_cfg.store_key {
        settings.store_key = Some(v);
    }
    if let Some(v) = file_cfg.collection {
        settings.collection = v;
    }
    if let Some(v) = file_cfg.fetch_timeout_secs {
        settings.fetch_timeout_secs = v;
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("CAMPAIGNS_STORE_URL") {
        settings.store_url = v;
    }
    if let Some(v) = env("APP__STORE_URL") {
        settings.store_url = v;
    }

    if let Some(v) = env("CAMPAIGNS_STORE_KEY") {
        settings.store_key = Some(v);
    }
    if let Some(v) = env("APP__STORE_KEY") {
        settings.store_key = Some(v);
    }

    if let Some(v) = env("APP__COLLECTION") {
        settings.collection = v;
    }

    if let Some(v) = env("APP__FETCH_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.fetch_timeout_secs = parsed,
            Err(_) => warn!(value = %v, "config: ignoring invalid APP__FETCH_TIMEOUT_SECS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
