use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::FilterPolicy;
use crate::infrastructure::api::ApiMethods;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub company: Option<String>,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub filter_policy: FilterPolicy,
    pub methods: ApiMethods,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_secret: None,
            company: None,
            refresh_interval_secs: 120,
            request_timeout_secs: 15,
            filter_policy: FilterPolicy::default(),
            methods: ApiMethods::default(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Load the config file. A missing file yields defaults; a broken one is an error.
pub fn load() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("GARAGE_DASH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("garage-dash").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("garage-dash").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "garage-dash", "garage-dash")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("garage-dash"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("garage-dash"));
    }
    directories::ProjectDirs::from("io", "garage-dash", "garage-dash")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("garage-dash.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert_eq!(config.filter_policy, FilterPolicy::Persist);
        assert_eq!(config.methods, ApiMethods::default());
    }

    #[test]
    fn test_full_file() {
        let config: Config = toml::from_str(
            r#"
            base_url = "https://erp.example.com"
            api_key = "key"
            api_secret = "secret"
            company = "Main Garage"
            refresh_interval_secs = 60
            filter_policy = "reset_on_switch"

            [methods]
            sidebar = "custom_app.api.sidebar"
            "#,
        )
        .unwrap();
        assert_eq!(config.company.as_deref(), Some("Main Garage"));
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.filter_policy, FilterPolicy::ResetOnSwitch);
        assert_eq!(config.methods.sidebar, "custom_app.api.sidebar");
        assert_eq!(config.methods.dashboard, ApiMethods::default().dashboard);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = std::env::temp_dir().join(format!("garage-dash-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "refresh_interval_secs = \"soon\"").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
        let _ = fs::remove_dir_all(&dir);
    }
}
