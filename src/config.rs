//! Environment-driven configuration for the document store connection
//!
//! The store client never reads the environment itself; callers build a
//! `StoreConfig` once (usually via [`StoreConfig::from_env`]) and pass it
//! into the client constructor explicitly.

use thiserror::Error;
use url::Url;

/// Default locale applied to localized schema fields when the
/// environment does not override it.
pub const DEFAULT_COLLECTION_LOCALE: &str = "en";

/// Connection parameters for the backing document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Store hostname, without scheme or port.
    pub host: String,
    /// Port, omitted from the URL when not set.
    pub port: Option<u16>,
    /// Optional path prefix the store is mounted under (e.g. behind a proxy).
    pub path: String,
    /// URL scheme, `http` or `https`.
    pub protocol: String,
    /// Locale for localized collection fields.
    pub locale: String,
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable was set to an unusable value
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    /// The assembled base URL did not parse
    #[error("invalid store base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl StoreConfig {
    /// Load the store configuration from `TYPESENSE_*` environment variables.
    ///
    /// `TYPESENSE_API_KEY` and `TYPESENSE_HOST` are required. Port and path
    /// prefix are optional; protocol defaults to `http` and the collection
    /// locale to `en`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            required_var("TYPESENSE_API_KEY")?;
        let host = required_var("TYPESENSE_HOST")?;
        let port = match std::env::var("TYPESENSE_PORT") {
            Ok(raw) => Some(raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                var: "TYPESENSE_PORT",
                reason: e.to_string(),
            })?),
            Err(_) => None,
        };
        let path = std::env::var("TYPESENSE_PATH").unwrap_or_default();
        let protocol =
            std::env::var("TYPESENSE_PROTOCOL").unwrap_or_else(|_| "http".to_string());
        let locale = std::env::var("TYPESENSE_COLLECTION_LOCALE")
            .unwrap_or_else(|_| DEFAULT_COLLECTION_LOCALE.to_string());

        Ok(Self {
            api_key,
            host,
            port,
            path,
            protocol,
            locale,
        })
    }

    /// Assemble the base URL every store request is resolved against.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = match self.port {
            Some(port) => format!("{}://{}:{}{}", self.protocol, self.host, port, self.path),
            None => format!("{}://{}{}", self.protocol, self.host, self.path),
        };
        Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
