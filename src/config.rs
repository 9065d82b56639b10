//! Runtime configuration.
//!
//! Read from a JSON file at `$FLOWBRIDGE_CONFIG`, or `config.json` under the
//! platform config directory. A missing file means defaults. Capture state is
//! deliberately absent: it always starts disabled.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bridge::{KeyMap, KeyMapPreset, DEFAULT_EVENT_BUFFER};

/// Default server port.
pub const DEFAULT_PORT: u16 = 13235;
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const CONFIG_PATH_ENV: &str = "FLOWBRIDGE_CONFIG";
pub const PORT_ENV: &str = "FLOWBRIDGE_PORT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for the channel endpoints. Generated at startup if unset.
    pub api_token: Option<String>,
    pub keymap: KeyMapPreset,
    /// Subscriber inbound buffer; events beyond it are dropped.
    pub event_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_token: None,
            keymap: KeyMapPreset::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl BridgeConfig {
    /// Resolves the config path: env override first, then the config dir.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("flowbridge")
                .join("config.json"),
        }
    }

    /// Loads from the default path and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path())?;
        if let Ok(port) = std::env::var(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{PORT_ENV}={port} is not a port")))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid("event_buffer must be at least 1".into()));
        }
        if self.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("api_token must not be blank".into()));
        }
        Ok(())
    }

    pub fn keymap(&self) -> KeyMap {
        self.keymap.into()
    }

    /// Returns the configured token, generating one if none was set.
    ///
    /// The second value is `true` when the token was generated.
    pub fn resolve_token(&mut self) -> (String, bool) {
        match &self.api_token {
            Some(token) => (token.clone(), false),
            None => {
                let token = generate_token();
                self.api_token = Some(token.clone());
                (token, true)
            }
        }
    }
}

/// Generates a random URL-safe bearer token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.keymap(), KeyMap::WINDOWS);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 9000, "keymap": "android", "api_token": "secret"}}"#).unwrap();

        let config = BridgeConfig::load_from(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.keymap(), KeyMap::ANDROID);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = BridgeConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_zero_buffer_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"event_buffer": 0}}"#).unwrap();

        let err = BridgeConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_resolve_token_generates_once() {
        let mut config = BridgeConfig::default();
        let (first, generated) = config.resolve_token();
        assert!(generated);
        // 32 bytes, unpadded base64
        assert_eq!(first.len(), 43);

        let (second, generated) = config.resolve_token();
        assert!(!generated);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }
}
