use super::Result;
use crate::api::client::ClientConfig;
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::validate_url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "loan-checkout";
const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub server_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server_url: crate::api::client::DEFAULT_SERVER_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Profile {
    /// Transport settings for this profile.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::for_server(&self.server_url);
        match self.timeout_seconds {
            Some(seconds) => config.with_timeout(Duration::from_secs(seconds)),
            None => config,
        }
    }

    /// Apply a `config set` key to this profile.
    pub fn set_value(&mut self, key: &str, value: &str) -> crate::Result<()> {
        match key {
            "server-url" => {
                validate_url(value)?;
                self.server_url = value.to_string();
            }
            "timeout-seconds" => {
                let seconds: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                    field: key.to_string(),
                    value: value.to_string(),
                    reason: "expected a whole number of seconds".to_string(),
                })?;
                if seconds == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                        reason: "timeout must be greater than zero".to_string(),
                    }
                    .into());
                }
                self.timeout_seconds = Some(seconds);
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("no configuration at {}", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            message: format!("{}: {}", config_path.display(), e),
        })
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigSaveFailed {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    /// Location of the configuration file inside `dir`.
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(Self::file_in(&config_dir.join(APP_DIR)))
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Profile name to use when none is given on the command line.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}
