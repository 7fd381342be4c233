//! Relay configuration sourced from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::conversation::DEFAULT_MAX_TURNS;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default model name.
pub const DEFAULT_MODEL: &str = "llama2";
/// Default inference deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default knowledge file location, relative to the working directory.
pub const DEFAULT_KNOWLEDGE_PATH: &str = "data/knowledge.json";
/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "public";

const PORT_ENV: &str = "PORT";
const OLLAMA_URL_ENV: &str = "OLLAMA_URL";
const MODEL_ENV: &str = "OLLAMA_MODEL";
const TIMEOUT_ENV: &str = "OLLAMA_TIMEOUT_SECS";
const KNOWLEDGE_PATH_ENV: &str = "MHI_KNOWLEDGE_PATH";
const STATIC_DIR_ENV: &str = "MHI_STATIC_DIR";
const MAX_HISTORY_ENV: &str = "MHI_MAX_HISTORY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The upstream URL is not a valid http(s) URL.
    #[error("invalid Ollama URL {value:?}: {reason}")]
    InvalidUrl {
        /// Raw value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Convenience result alias for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Runtime settings of the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    /// Listening port.
    pub port: u16,
    /// Ollama base URL, without trailing slash.
    pub ollama_url: String,
    /// Model name sent with every chat request.
    pub model: String,
    /// Deadline of one inference call.
    pub request_timeout: Duration,
    /// Knowledge file path.
    pub knowledge_path: PathBuf,
    /// Directory served for non-API paths.
    pub static_dir: PathBuf,
    /// Maximum turns per conversation, system prompt included.
    pub max_turns: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            knowledge_path: PathBuf::from(DEFAULT_KNOWLEDGE_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl RelayConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset or empty keys keep defaults.
    ///
    /// # Errors
    /// Returns an error if a value cannot be parsed or fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get(PORT_ENV) {
            config.port = parse_var(PORT_ENV, &port)?;
        }
        if let Some(url) = get(OLLAMA_URL_ENV) {
            config.ollama_url = url.trim().to_string();
        }
        if let Some(model) = get(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(parse_var(TIMEOUT_ENV, &secs)?);
        }
        if let Some(path) = get(KNOWLEDGE_PATH_ENV) {
            config.knowledge_path = PathBuf::from(path);
        }
        if let Some(dir) = get(STATIC_DIR_ENV) {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(max) = get(MAX_HISTORY_ENV) {
            config.max_turns = parse_var(MAX_HISTORY_ENV, &max)?;
        }

        config.validate()?;
        config.ollama_url = config.ollama_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the URL is not http(s), the timeout is zero or the
    /// history bound cannot hold an exchange.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = Url::parse(&self.ollama_url).map_err(|e| ConfigError::InvalidUrl {
            value: self.ollama_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: self.ollama_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: TIMEOUT_ENV,
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.max_turns < 3 {
            return Err(ConfigError::InvalidValue {
                var: MAX_HISTORY_ENV,
                value: self.max_turns.to_string(),
                reason: "must be >= 3".to_string(),
            });
        }

        Ok(())
    }

    /// Set the upstream URL.
    #[must_use]
    pub fn with_ollama_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = url.into();
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the static asset directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() -> ConfigResult<()> {
        let config = RelayConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.model, "llama2");
        assert_eq!(config.max_turns, 21);
        Ok(())
    }

    #[test]
    fn test_overrides_are_applied() -> ConfigResult<()> {
        let config = RelayConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("OLLAMA_URL", "http://gpu-box:11434/"),
            ("OLLAMA_MODEL", "mistral"),
            ("OLLAMA_TIMEOUT_SECS", "30"),
            ("MHI_STATIC_DIR", "www"),
            ("MHI_MAX_HISTORY", "11"),
        ]))?;
        assert_eq!(config.port, 8080);
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.static_dir, PathBuf::from("www"));
        assert_eq!(config.max_turns, 11);
        Ok(())
    }

    #[test]
    fn test_url_whitespace_is_stripped() -> ConfigResult<()> {
        let config =
            RelayConfig::from_lookup(lookup(&[("OLLAMA_URL", " http://gpu-box:11434/ \n")]))?;
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        Ok(())
    }

    #[test]
    fn test_empty_values_keep_defaults() -> ConfigResult<()> {
        let config = RelayConfig::from_lookup(lookup(&[("PORT", ""), ("OLLAMA_MODEL", "  ")]))?;
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model, DEFAULT_MODEL);
        Ok(())
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = RelayConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { var: "PORT", .. })
        ));
    }

    #[test]
    fn test_bad_url_is_rejected() {
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[("OLLAMA_URL", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RelayConfig::from_lookup(lookup(&[("OLLAMA_URL", "ftp://host")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_and_tiny_history_are_rejected() {
        assert!(RelayConfig::from_lookup(lookup(&[("OLLAMA_TIMEOUT_SECS", "0")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("MHI_MAX_HISTORY", "2")])).is_err());
    }
}
