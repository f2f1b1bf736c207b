//! Cold Start Handling
//!
//! Users without click history get the precomputed popularity ranking.

use crate::artifacts::ArtifactSet;
use crate::types::Recommendation;

/// Handle cold start recommendations
///
/// Steps:
/// 1. Take the popularity ranking, most popular first
/// 2. Keep the first `top_n` ids
/// 3. Emit them without a score
///
/// Nothing is excluded here: a cold-start user has no history to exclude.
pub struct HandleColdStartUser;

impl HandleColdStartUser {
    pub fn execute(artifacts: &ArtifactSet, top_n: usize) -> Vec<Recommendation> {
        artifacts
            .popular_articles()
            .iter()
            .take(top_n)
            .map(|&article_id| Recommendation::unscored(article_id))
            .collect()
    }
}
