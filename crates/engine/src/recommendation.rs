//! Last-Click Recommendation Engine
//!
//! Recommends articles similar to the one a user clicked most recently,
//! falling back to the popularity ranking for users without history.

use crate::artifacts::ArtifactSet;
use crate::cold_start::HandleColdStartUser;
use crate::error::RecommendError;
use crate::profile::ResolveUserProfile;
use crate::similarity::RankBySimilarity;
use crate::store::ArtifactStore;
use crate::types::{
    ArticleRow, Recommendation, RecommendationResponse, RecommendationSource, UserId,
};
use article_recs_core::config::RecommendationConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Result of one recommendation run, tagged with the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutcome {
    pub source: RecommendationSource,
    pub recommendations: Vec<Recommendation>,
}

/// Generate recommendations for one user
///
/// Steps:
/// 1. Resolve the last-click profile
/// 2. No profile: return the popularity prefix (cold start)
/// 3. Score every article against the profile
/// 4. Drop every article the user already clicked
/// 5. Rank by score descending, row ascending on ties
/// 6. Map the top rows to article ids
pub struct GenerateRecommendations;

impl GenerateRecommendations {
    /// # Errors
    ///
    /// [`RecommendError::InvalidTopN`] for `top_n == 0` and
    /// [`RecommendError::DimensionMismatch`] when the profile does not fit
    /// the embedding matrix. An unknown user is not an error.
    pub fn execute(
        artifacts: &ArtifactSet,
        user_id: UserId,
        top_n: usize,
    ) -> Result<RecommendationOutcome, RecommendError> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN(
                "top_n must be greater than 0".to_string(),
            ));
        }

        // Step 1-2: Resolve profile or fall back to popularity
        let Some(profile) = ResolveUserProfile::execute(artifacts, user_id) else {
            return Ok(RecommendationOutcome {
                source: RecommendationSource::Popularity,
                recommendations: HandleColdStartUser::execute(artifacts, top_n),
            });
        };

        debug!(
            user_id = %user_id,
            last_row = profile.last_row,
            clicks = profile.clicked_rows.len(),
            "Resolved last-click profile"
        );

        // Step 3-5: Score, exclude seen rows, rank
        let seen: HashSet<ArticleRow> = profile.clicked_rows.iter().copied().collect();
        let ranked = RankBySimilarity::execute(artifacts, profile.vector, &seen, top_n)?;

        // Step 6: Rows are index-aligned with metadata
        let recommendations = ranked
            .into_iter()
            .filter_map(|scored| {
                artifacts
                    .article_id_at(scored.row)
                    .map(|article_id| Recommendation::scored(article_id, scored.score))
            })
            .collect();

        Ok(RecommendationOutcome {
            source: RecommendationSource::LastClick,
            recommendations,
        })
    }
}

/// Request-facing recommender bound to the live artifact store
pub struct Recommender {
    store: Arc<ArtifactStore>,
    config: RecommendationConfig,
}

impl Recommender {
    pub fn new(store: Arc<ArtifactStore>, config: RecommendationConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Recommend for `user_id` against the current artifact snapshot.
    ///
    /// `top_n` defaults to the configured value and may not exceed the
    /// configured maximum.
    #[instrument(skip_all, fields(user_id = %user_id, top_n = ?top_n))]
    pub async fn recommend(
        &self,
        user_id: UserId,
        top_n: Option<usize>,
    ) -> Result<RecommendationResponse, RecommendError> {
        let top_n = self.resolve_top_n(top_n)?;
        let start = Instant::now();

        let artifacts = self.store.snapshot().await;
        let outcome = GenerateRecommendations::execute(&artifacts, user_id, top_n)?;

        info!(
            user_id = %user_id,
            source = ?outcome.source,
            top_n,
            returned = outcome.recommendations.len(),
            latency_us = start.elapsed().as_micros() as u64,
            "Recommendations generated"
        );

        Ok(RecommendationResponse {
            user_id,
            recommendations: outcome.recommendations,
        })
    }

    fn resolve_top_n(&self, requested: Option<usize>) -> Result<usize, RecommendError> {
        let top_n = requested.unwrap_or(self.config.default_top_n);

        if top_n == 0 {
            return Err(RecommendError::InvalidTopN(
                "top_n must be greater than 0".to_string(),
            ));
        }

        if top_n > self.config.max_top_n {
            return Err(RecommendError::InvalidTopN(format!(
                "top_n {} exceeds the maximum of {}",
                top_n, self.config.max_top_n
            )));
        }

        Ok(top_n)
    }
}
