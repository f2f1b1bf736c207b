//! Article Recommendation Engine
//!
//! Last-click content recommendations over precomputed article embeddings,
//! with a popularity fallback for users without click history.

pub mod artifacts;
pub mod cold_start;
pub mod error;
pub mod loader;
pub mod profile;
pub mod recommendation;
pub mod server;
pub mod similarity;
pub mod store;
pub mod types;

// Re-export key types
pub use artifacts::{ArticleMetadata, ArtifactSet, ArtifactStats, ClickHistory};
pub use cold_start::HandleColdStartUser;
pub use error::{ArtifactError, RecommendError};
pub use loader::{load_artifact_set, ArtifactKind, ArtifactSource, EmbeddingMatrix, FsArtifactSource};
pub use profile::{LastClickProfile, ResolveUserProfile};
pub use recommendation::{GenerateRecommendations, RecommendationOutcome, Recommender};
pub use server::{configure_routes, AppState};
pub use similarity::{RankBySimilarity, ScoredArticle};
pub use store::ArtifactStore;
pub use types::*;

#[cfg(test)]
mod tests;
