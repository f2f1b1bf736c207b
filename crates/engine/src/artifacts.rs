//! In-memory artifact set
//!
//! Holds the four precomputed inputs of the recommender: article metadata,
//! the embedding matrix, per-user click history and the popularity ranking.
//! An [`ArtifactSet`] is validated once when built and never mutated; a
//! refresh builds a whole new set.

use crate::error::ArtifactError;
use crate::types::{ArticleId, ArticleRow, UserId};
use article_recs_core::math::l2_norm;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the article metadata table.
///
/// Only `article_id` is required; the remaining columns are carried when the
/// source table provides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub article_id: ArticleId,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub created_at_ts: Option<i64>,
    #[serde(default)]
    pub publisher_id: Option<u64>,
    #[serde(default)]
    pub words_count: Option<u32>,
}

impl ArticleMetadata {
    pub fn new(article_id: ArticleId) -> Self {
        Self {
            article_id,
            category_id: None,
            created_at_ts: None,
            publisher_id: None,
            words_count: None,
        }
    }
}

/// Click history: user id to clicked article rows, oldest first
pub type ClickHistory = HashMap<u64, Vec<ArticleRow>>;

/// Summary counts reported by readiness and reload endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactStats {
    pub articles: usize,
    pub dimension: usize,
    pub users: usize,
    pub popular_articles: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Immutable, validated set of recommendation artifacts
#[derive(Debug)]
pub struct ArtifactSet {
    metadata: Vec<ArticleMetadata>,
    embeddings: Array2<f32>,
    /// L2 norm of every embedding row, precomputed at load
    norms: Array1<f32>,
    user_clicks: ClickHistory,
    popular_articles: Vec<ArticleId>,
    rows_by_article: HashMap<ArticleId, ArticleRow>,
    loaded_at: DateTime<Utc>,
}

impl ArtifactSet {
    /// Build and validate an artifact set.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Invalid`] when metadata and embedding rows are
    /// not index-aligned, the matrix has zero width or non-finite values,
    /// article ids repeat, a click points outside the matrix, or a popular
    /// article is missing from the metadata table.
    pub fn new(
        metadata: Vec<ArticleMetadata>,
        embeddings: Array2<f32>,
        user_clicks: ClickHistory,
        popular_articles: Vec<ArticleId>,
    ) -> Result<Self, ArtifactError> {
        let rows = embeddings.nrows();

        if metadata.len() != rows {
            return Err(ArtifactError::Invalid(format!(
                "metadata has {} rows but embedding matrix has {}",
                metadata.len(),
                rows
            )));
        }

        if embeddings.ncols() == 0 {
            return Err(ArtifactError::Invalid(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        if let Some((index, _)) = embeddings.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ArtifactError::Invalid(format!(
                "embedding row {} contains a non-finite value",
                index / embeddings.ncols()
            )));
        }

        let mut rows_by_article = HashMap::with_capacity(rows);
        for (row, article) in metadata.iter().enumerate() {
            if let Some(previous) = rows_by_article.insert(article.article_id, row) {
                return Err(ArtifactError::Invalid(format!(
                    "article_id {} appears at rows {} and {}",
                    article.article_id, previous, row
                )));
            }
        }

        for (user, clicks) in &user_clicks {
            if let Some(row) = clicks.iter().find(|&&row| row >= rows) {
                return Err(ArtifactError::Invalid(format!(
                    "user {} clicked row {} but only {} articles exist",
                    user, row, rows
                )));
            }
        }

        if let Some(article_id) = popular_articles
            .iter()
            .find(|id| !rows_by_article.contains_key(*id))
        {
            return Err(ArtifactError::Invalid(format!(
                "popular article {} is missing from metadata",
                article_id
            )));
        }

        let norms = embeddings
            .axis_iter(Axis(0))
            .map(|row| match row.as_slice() {
                Some(values) => l2_norm(values),
                None => row.dot(&row).sqrt(),
            })
            .collect::<Array1<f32>>();

        Ok(Self {
            metadata,
            embeddings,
            norms,
            user_clicks,
            popular_articles,
            rows_by_article,
            loaded_at: Utc::now(),
        })
    }

    pub fn article_count(&self) -> usize {
        self.metadata.len()
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.ncols()
    }

    pub fn user_count(&self) -> usize {
        self.user_clicks.len()
    }

    pub fn embeddings(&self) -> &Array2<f32> {
        &self.embeddings
    }

    /// Precomputed L2 norms, aligned with embedding rows
    pub fn norms(&self) -> &Array1<f32> {
        &self.norms
    }

    pub fn embedding(&self, row: ArticleRow) -> Option<ArrayView1<'_, f32>> {
        (row < self.embeddings.nrows()).then(|| self.embeddings.row(row))
    }

    pub fn metadata(&self, row: ArticleRow) -> Option<&ArticleMetadata> {
        self.metadata.get(row)
    }

    pub fn article_id_at(&self, row: ArticleRow) -> Option<ArticleId> {
        self.metadata.get(row).map(|m| m.article_id)
    }

    pub fn row_of(&self, article_id: ArticleId) -> Option<ArticleRow> {
        self.rows_by_article.get(&article_id).copied()
    }

    /// Clicked rows for a user, oldest first. `None` for unknown users.
    pub fn clicks(&self, user_id: UserId) -> Option<&[ArticleRow]> {
        self.user_clicks.get(&user_id.0).map(Vec::as_slice)
    }

    /// Popular article ids, most popular first
    pub fn popular_articles(&self) -> &[ArticleId] {
        &self.popular_articles
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn stats(&self) -> ArtifactStats {
        ArtifactStats {
            articles: self.article_count(),
            dimension: self.dimension(),
            users: self.user_count(),
            popular_articles: self.popular_articles.len(),
            loaded_at: self.loaded_at,
        }
    }
}
