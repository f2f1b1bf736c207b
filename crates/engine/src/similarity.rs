//! Similarity Ranking
//!
//! Scores every article against a profile vector with cosine similarity and
//! returns the best unseen rows.
//!
//! Ordering is total: score descending, then row ascending. Excluded rows are
//! dropped from the candidate list before ranking rather than being given an
//! out-of-range score.

use crate::artifacts::ArtifactSet;
use crate::error::RecommendError;
use crate::types::ArticleRow;
use article_recs_core::math::cosine_from_parts;
use ndarray::ArrayView1;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A candidate row with its similarity to the profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredArticle {
    pub row: ArticleRow,
    pub score: f32,
}

/// Total order used for ranking: higher score first, lower row on ties
pub fn rank_order(a: &ScoredArticle, b: &ScoredArticle) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.row.cmp(&b.row))
}

pub struct RankBySimilarity;

impl RankBySimilarity {
    /// Cosine similarity of `profile` against every embedding row, aligned by row.
    ///
    /// A zero-magnitude profile or row scores `0.0`.
    ///
    /// # Errors
    ///
    /// [`RecommendError::DimensionMismatch`] when the profile length differs
    /// from the matrix width.
    pub fn score_all(
        artifacts: &ArtifactSet,
        profile: ArrayView1<'_, f32>,
    ) -> Result<Vec<f32>, RecommendError> {
        let embeddings = artifacts.embeddings();
        if profile.len() != embeddings.ncols() {
            return Err(RecommendError::DimensionMismatch {
                expected: embeddings.ncols(),
                actual: profile.len(),
            });
        }

        let profile_norm = profile.dot(&profile).sqrt();
        let dots = embeddings.dot(&profile);

        Ok(dots
            .iter()
            .zip(artifacts.norms().iter())
            .map(|(&dot, &norm)| cosine_from_parts(dot, profile_norm, norm))
            .collect())
    }

    /// Top `top_n` rows by similarity, skipping every row in `excluded`.
    ///
    /// Returns fewer than `top_n` entries only when fewer unexcluded rows exist.
    pub fn execute(
        artifacts: &ArtifactSet,
        profile: ArrayView1<'_, f32>,
        excluded: &HashSet<ArticleRow>,
        top_n: usize,
    ) -> Result<Vec<ScoredArticle>, RecommendError> {
        let scores = Self::score_all(artifacts, profile)?;

        let mut candidates: Vec<ScoredArticle> = scores
            .into_iter()
            .enumerate()
            .filter(|(row, _)| !excluded.contains(row))
            .map(|(row, score)| ScoredArticle { row, score })
            .collect();

        if top_n == 0 {
            return Ok(Vec::new());
        }

        // Partition around the N-th best first so only the head is fully sorted
        if candidates.len() > top_n {
            candidates.select_nth_unstable_by(top_n - 1, rank_order);
            candidates.truncate(top_n);
        }
        candidates.sort_unstable_by(rank_order);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArticleMetadata;
    use ndarray::{array, Array2};
    use std::collections::HashMap;

    fn artifacts(embeddings: Array2<f32>) -> ArtifactSet {
        let rows = embeddings.nrows() as u64;
        ArtifactSet::new(
            (0..rows).map(|i| ArticleMetadata::new(1000 + i)).collect(),
            embeddings,
            HashMap::new(),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_score_all_matches_cosine() {
        let artifacts = artifacts(array![[1.0, 0.0], [0.0, 2.0], [-3.0, 0.0], [1.0, 1.0]]);
        let profile = array![2.0f32, 0.0];

        let scores = RankBySimilarity::score_all(&artifacts, profile.view()).unwrap();

        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert_eq!(scores[1], 0.0);
        assert!((scores[2] + 1.0).abs() < 1e-6);
        assert!((scores[3] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_ranking_descending_with_row_tiebreak() {
        // Rows 1 and 3 are identical, so they tie
        let artifacts = artifacts(array![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        let profile = array![1.0f32, 1.0];

        let ranked =
            RankBySimilarity::execute(&artifacts, profile.view(), &HashSet::new(), 4).unwrap();
        let rows: Vec<_> = ranked.iter().map(|s| s.row).collect();

        assert_eq!(rows, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_excluded_rows_never_returned() {
        let artifacts = artifacts(array![[1.0, 0.0], [0.9, 0.1], [0.0, 1.0]]);
        let profile = array![1.0f32, 0.0];
        let excluded = HashSet::from([0]);

        let ranked = RankBySimilarity::execute(&artifacts, profile.view(), &excluded, 3).unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.row != 0));
        assert_eq!(ranked[0].row, 1);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let artifacts = artifacts(Array2::from_shape_fn((50, 3), |(r, c)| {
            ((r * 7 + c * 3) % 11) as f32 - 5.0
        }));
        let profile = array![1.0f32, -1.0, 0.5];

        let top = RankBySimilarity::execute(&artifacts, profile.view(), &HashSet::new(), 5).unwrap();
        let all =
            RankBySimilarity::execute(&artifacts, profile.view(), &HashSet::new(), 50).unwrap();

        assert_eq!(top.len(), 5);
        assert_eq!(top[..], all[..5]);
    }

    #[test]
    fn test_zero_profile_scores_everything_zero() {
        let artifacts = artifacts(array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]);
        let profile = array![0.0f32, 0.0];

        let ranked =
            RankBySimilarity::execute(&artifacts, profile.view(), &HashSet::from([2]), 5).unwrap();

        assert_eq!(
            ranked,
            vec![
                ScoredArticle { row: 0, score: 0.0 },
                ScoredArticle { row: 1, score: 0.0 },
            ]
        );
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let artifacts = artifacts(array![[1.0, 0.0, 0.0]]);
        let profile = array![1.0f32, 0.0];

        let err = RankBySimilarity::execute(&artifacts, profile.view(), &HashSet::new(), 5)
            .unwrap_err();
        assert!(matches!(
            err,
            RecommendError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_rank_order_is_total_for_equal_scores() {
        let a = ScoredArticle { row: 4, score: 0.5 };
        let b = ScoredArticle { row: 9, score: 0.5 };
        assert_eq!(rank_order(&a, &b), Ordering::Less);
        assert_eq!(rank_order(&b, &a), Ordering::Greater);
        assert_eq!(rank_order(&a, &a), Ordering::Equal);
    }
}
