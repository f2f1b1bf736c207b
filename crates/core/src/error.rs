use thiserror::Error;

/// Errors raised by the shared core utilities
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration value is missing, unparseable or out of range
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        /// Environment variable that caused the failure, when known
        key: Option<String>,
    },

    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        CoreError::ConfigurationError {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Environment key associated with a configuration error
    pub fn key(&self) -> Option<&str> {
        match self {
            CoreError::ConfigurationError { key, .. } => key.as_deref(),
            CoreError::LoggingInit(_) => None,
        }
    }
}
