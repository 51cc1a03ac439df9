use std::{env, path::PathBuf, sync::LazyLock};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{SvError, SvResult};

pub const API_URL_ENV: &str = "STOCKVIEW_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

static APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Resolved once at startup; later changes to the file or the environment
/// only apply to the next process.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    let stored = match confy::load::<Config>(APP_NAME, None) {
        Ok(config) => config,
        Err(err) => {
            warn!("[Config] {err}, using defaults");
            Config::default()
        }
    };

    let config = stored.with_env_override(env::var(API_URL_ENV).ok());
    debug!("[Config] api_url = {}", config.api_url);

    config
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.map(|s| s.trim().to_string()) {
            if !api_url.is_empty() {
                self.api_url = api_url;
            }
        }

        self
    }
}

pub fn config_path() -> SvResult<PathBuf> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

/// The stored configuration, without the environment override.
pub fn load_stored() -> SvResult<Config> {
    Ok(confy::load::<Config>(APP_NAME, None)?)
}

pub fn set(key: &str, value: &str) -> SvResult<Config> {
    let mut config = load_stored()?;

    match key.to_lowercase().as_str() {
        "api_url" => {
            url::Url::parse(value)?;
            config.api_url = value.trim().to_string();
        }
        _ => {
            return Err(SvError::Invalid {
                code: "UNKNOWN_CONFIG_KEY",
                message: format!("Unknown config key '{key}'"),
            });
        }
    }

    confy::store(APP_NAME, None, &config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url() {
        assert_eq!(Config::default().api_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_env_override() {
        let config =
            Config::default().with_env_override(Some("http://10.0.0.2:8000/api".to_string()));
        assert_eq!(config.api_url, "http://10.0.0.2:8000/api");

        let config = Config::default().with_env_override(Some("  ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);

        let config = Config::default().with_env_override(None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
