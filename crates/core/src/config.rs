//! Shared configuration loader module for the recommendation services
//!
//! This module provides a unified configuration loading system with environment variable
//! parsing, validation, and support for .env files. All configuration uses the
//! `ARTICLE_RECS_` prefix for environment variables.
//!
//! Override hierarchy: defaults < .env < environment.
//!
//! # Example
//!
//! ```no_run
//! use article_recs_core::config::{ArtifactConfig, ConfigLoader, ServiceConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! article_recs_core::config::load_dotenv();
//!
//! let service_config = ServiceConfig::from_env()?;
//! let artifact_config = ArtifactConfig::from_env()?;
//!
//! service_config.validate()?;
//! artifact_config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::CoreError;
use crate::observability::{LogConfig, LogFormat};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// Reads environment variables with the `ARTICLE_RECS_` prefix and constructs
    /// a configuration instance with defaults for missing optional values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if an environment variable value cannot be parsed.
    fn from_env() -> Result<Self, CoreError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), CoreError>;
}

/// Service configuration
///
/// HTTP bind settings and logging.
///
/// # Environment Variables
///
/// - `ARTICLE_RECS_SERVICE_HOST` (optional): Service bind host (default: "0.0.0.0")
/// - `ARTICLE_RECS_SERVICE_PORT` (optional): Service bind port (default: 8080, falls back to `PORT`)
/// - `ARTICLE_RECS_SERVICE_WORKERS` (optional): Number of worker threads (default: CPU count)
/// - `ARTICLE_RECS_SERVICE_LOG_LEVEL` (optional): Log level (default: "info", falls back to `RUST_LOG`)
/// - `ARTICLE_RECS_SERVICE_LOG_FORMAT` (optional): `json` or `pretty` (default: "json")
/// - `ARTICLE_RECS_SERVICE_ADMIN_TOKEN` (optional): Bearer token for admin routes (unset disables them)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Shared secret for admin routes; `None` disables them
    pub admin_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            admin_token: None,
        }
    }
}

impl ServiceConfig {
    /// Address string suitable for `HttpServer::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, CoreError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var("ARTICLE_RECS_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match std::env::var("ARTICLE_RECS_SERVICE_PORT") {
            Ok(_) => parse_env_var("ARTICLE_RECS_SERVICE_PORT", defaults.port)?,
            Err(_) => parse_env_var("PORT", defaults.port)?,
        };

        let workers = parse_env_var("ARTICLE_RECS_SERVICE_WORKERS", defaults.workers)?;

        let log_level = std::env::var("ARTICLE_RECS_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(defaults.log_level);

        let log_format = match std::env::var("ARTICLE_RECS_SERVICE_LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.log_format,
        };

        // An empty value is treated as unset
        let admin_token = std::env::var("ARTICLE_RECS_SERVICE_ADMIN_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Ok(Self {
            host,
            port,
            workers,
            log_level,
            log_format,
            admin_token,
        })
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.port == 0 {
            return Err(CoreError::config(
                "port must be greater than 0",
                "ARTICLE_RECS_SERVICE_PORT",
            ));
        }

        if self.workers == 0 {
            return Err(CoreError::config(
                "workers must be greater than 0",
                "ARTICLE_RECS_SERVICE_WORKERS",
            ));
        }

        // RUST_LOG style directives ("info,actix_web=warn") are accepted as long as
        // the leading level is a known one
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        let leading = self
            .log_level
            .split(',')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if !valid_log_levels.contains(&leading.as_str()) {
            return Err(CoreError::config(
                format!(
                    "Invalid log_level '{}'. Must be one of: {}",
                    self.log_level,
                    valid_log_levels.join(", ")
                ),
                "ARTICLE_RECS_SERVICE_LOG_LEVEL",
            ));
        }

        Ok(())
    }
}

/// Artifact configuration
///
/// Location of the four precomputed artifacts and the refresh cadence.
///
/// # Environment Variables
///
/// - `ARTICLE_RECS_ARTIFACT_DIR` (optional): Directory holding the artifacts (default: "./data")
/// - `ARTICLE_RECS_ARTIFACT_METADATA_FILE` (optional): default "articles_metadata.csv"
/// - `ARTICLE_RECS_ARTIFACT_EMBEDDINGS_FILE` (optional): default "articles_embeddings.bin"
/// - `ARTICLE_RECS_ARTIFACT_USER_CLICKS_FILE` (optional): default "user_clicks.bin"
/// - `ARTICLE_RECS_ARTIFACT_POPULAR_FILE` (optional): default "popular_articles.bin"
/// - `ARTICLE_RECS_ARTIFACT_REFRESH_SECS` (optional): Periodic reload interval, 0 disables (default: 0)
///
/// # Example
///
/// ```bash
/// export ARTICLE_RECS_ARTIFACT_DIR="/srv/recs/artifacts"
/// export ARTICLE_RECS_ARTIFACT_REFRESH_SECS="3600"
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub metadata_file: String,
    pub embeddings_file: String,
    pub user_clicks_file: String,
    pub popular_articles_file: String,
    /// `None` disables periodic refresh
    pub refresh_interval: Option<Duration>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            metadata_file: "articles_metadata.csv".to_string(),
            embeddings_file: "articles_embeddings.bin".to_string(),
            user_clicks_file: "user_clicks.bin".to_string(),
            popular_articles_file: "popular_articles.bin".to_string(),
            refresh_interval: None,
        }
    }
}

impl ConfigLoader for ArtifactConfig {
    fn from_env() -> Result<Self, CoreError> {
        let defaults = ArtifactConfig::default();

        let dir = std::env::var("ARTICLE_RECS_ARTIFACT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.dir);

        let file = |key: &str, default: String| std::env::var(key).unwrap_or(default);

        let refresh_secs = parse_env_var("ARTICLE_RECS_ARTIFACT_REFRESH_SECS", 0u64)?;

        Ok(Self {
            dir,
            metadata_file: file("ARTICLE_RECS_ARTIFACT_METADATA_FILE", defaults.metadata_file),
            embeddings_file: file(
                "ARTICLE_RECS_ARTIFACT_EMBEDDINGS_FILE",
                defaults.embeddings_file,
            ),
            user_clicks_file: file(
                "ARTICLE_RECS_ARTIFACT_USER_CLICKS_FILE",
                defaults.user_clicks_file,
            ),
            popular_articles_file: file(
                "ARTICLE_RECS_ARTIFACT_POPULAR_FILE",
                defaults.popular_articles_file,
            ),
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
        })
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.dir.as_os_str().is_empty() {
            return Err(CoreError::config(
                "artifact directory must not be empty",
                "ARTICLE_RECS_ARTIFACT_DIR",
            ));
        }

        let files = [
            (&self.metadata_file, "ARTICLE_RECS_ARTIFACT_METADATA_FILE"),
            (&self.embeddings_file, "ARTICLE_RECS_ARTIFACT_EMBEDDINGS_FILE"),
            (&self.user_clicks_file, "ARTICLE_RECS_ARTIFACT_USER_CLICKS_FILE"),
            (&self.popular_articles_file, "ARTICLE_RECS_ARTIFACT_POPULAR_FILE"),
        ];
        for (name, key) in files {
            if name.trim().is_empty() {
                return Err(CoreError::config("artifact file name must not be empty", key));
            }
        }

        Ok(())
    }
}

/// Recommendation request defaults
///
/// # Environment Variables
///
/// - `ARTICLE_RECS_DEFAULT_TOP_N` (optional): Result count when the caller gives none (default: 5)
/// - `ARTICLE_RECS_MAX_TOP_N` (optional): Largest result count a caller may request (default: 100)
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_top_n: 100,
        }
    }
}

impl ConfigLoader for RecommendationConfig {
    fn from_env() -> Result<Self, CoreError> {
        let defaults = RecommendationConfig::default();

        Ok(Self {
            default_top_n: parse_env_var("ARTICLE_RECS_DEFAULT_TOP_N", defaults.default_top_n)?,
            max_top_n: parse_env_var("ARTICLE_RECS_MAX_TOP_N", defaults.max_top_n)?,
        })
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.default_top_n == 0 {
            return Err(CoreError::config(
                "default_top_n must be greater than 0",
                "ARTICLE_RECS_DEFAULT_TOP_N",
            ));
        }

        if self.default_top_n > self.max_top_n {
            return Err(CoreError::config(
                format!(
                    "default_top_n ({}) cannot exceed max_top_n ({})",
                    self.default_top_n, self.max_top_n
                ),
                "ARTICLE_RECS_DEFAULT_TOP_N",
            ));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable with default value
///
/// # Errors
///
/// Returns a `ConfigurationError` if the value is set but cannot be parsed
fn parse_env_var<T>(key: &str, default: T) -> Result<T, CoreError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| CoreError::config(format!("Failed to parse {}: {}", key, e), key)),
        Err(_) => Ok(default),
    }
}

/// Load .env file if present
///
/// Does not fail when the .env file is missing.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
