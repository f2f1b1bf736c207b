//! # Article Recs Core
//!
//! Shared building blocks for the article recommendation services.
//!
//! ## Modules
//!
//! - `config`: Configuration loading and validation
//! - `error`: Error types and handling
//! - `math`: Mathematical utilities for vector operations
//! - `observability`: Structured logging initialization

pub mod config;
pub mod error;
pub mod math;
pub mod observability;

// Re-export commonly used types
pub use config::{
    load_dotenv, ArtifactConfig, ConfigLoader, RecommendationConfig, ServiceConfig,
};
pub use error::CoreError;
pub use math::{cosine_from_parts, cosine_similarity, dot_product, l2_norm};
pub use observability::{init_logging, LogConfig, LogFormat};

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
