//! Shared request and response types

use crate::error::RecommendError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable article identifier from the metadata table
pub type ArticleId = u64;

/// Row position in the embedding matrix (and metadata table)
pub type ArticleRow = usize;

/// User identifier as used by the click history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl FromStr for UserId {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RecommendError::MissingUserId);
        }
        trimmed
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| RecommendError::InvalidUserId(trimmed.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

/// One recommended article.
///
/// `score` is `None` for popularity fallbacks, which serializes as `null`
/// and is distinct from a real similarity of `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub article_id: ArticleId,
    pub score: Option<f32>,
}

impl Recommendation {
    pub fn scored(article_id: ArticleId, score: f32) -> Self {
        Self {
            article_id,
            score: Some(score),
        }
    }

    pub fn unscored(article_id: ArticleId) -> Self {
        Self {
            article_id,
            score: None,
        }
    }
}

/// Which path produced a recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Similarity to the user's most recent click
    LastClick,
    /// Cold-start popularity ranking
    Popularity,
}

/// HTTP response body for the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub recommendations: Vec<Recommendation>,
}
