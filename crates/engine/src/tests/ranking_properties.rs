//! Property tests for ranking, exclusion and cold start

use super::fixtures::{article_id, artifact_set};
use crate::recommendation::GenerateRecommendations;
use crate::types::{Recommendation, RecommendationSource, UserId};
use article_recs_core::math::cosine_similarity;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const WARM_USER: u64 = 1;
const COLD_USER: u64 = 2;

#[derive(Debug, Clone)]
struct Case {
    rows: usize,
    dim: usize,
    values: Vec<i8>,
    clicks: Vec<usize>,
    popular: Vec<usize>,
    top_n: usize,
}

fn recommendation_case() -> impl Strategy<Value = Case> {
    (1usize..30, 1usize..6).prop_flat_map(|(rows, dim)| {
        (
            prop::collection::vec(-3i8..=3, rows * dim),
            prop::collection::vec(0..rows, 1..8),
            prop::collection::vec(0..rows, 0..10),
            1usize..40,
        )
            .prop_map(move |(values, clicks, popular, top_n)| Case {
                rows,
                dim,
                values,
                clicks,
                popular,
                top_n,
            })
    })
}

/// Brute-force reference: score every row, drop clicked rows, full sort
fn reference(case: &Case) -> Vec<Recommendation> {
    let row = |r: usize| &case.values[r * case.dim..(r + 1) * case.dim];
    let profile: Vec<f32> = row(*case.clicks.last().unwrap_or(&0))
        .iter()
        .map(|&v| f32::from(v))
        .collect();
    let seen: HashSet<usize> = case.clicks.iter().copied().collect();

    let mut scored: Vec<(usize, f32)> = (0..case.rows)
        .filter(|r| !seen.contains(r))
        .map(|r| {
            let candidate: Vec<f32> = row(r).iter().map(|&v| f32::from(v)).collect();
            (r, cosine_similarity(&profile, &candidate).unwrap_or(0.0))
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    scored
        .into_iter()
        .take(case.top_n)
        .map(|(r, score)| Recommendation::scored(article_id(r), score))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_warm_user_never_sees_clicked_articles(case in recommendation_case()) {
        let artifacts = artifact_set(
            case.rows,
            case.dim,
            &case.values,
            HashMap::from([(WARM_USER, case.clicks.clone())]),
            &case.popular,
        );
        let clicked: HashSet<u64> = case.clicks.iter().map(|&r| article_id(r)).collect();

        let outcome =
            GenerateRecommendations::execute(&artifacts, UserId(WARM_USER), case.top_n).unwrap();

        prop_assert_eq!(outcome.source, RecommendationSource::LastClick);
        for rec in &outcome.recommendations {
            prop_assert!(!clicked.contains(&rec.article_id));
        }

        let available = case.rows - clicked.len();
        prop_assert_eq!(outcome.recommendations.len(), case.top_n.min(available));
    }

    #[test]
    fn prop_ranking_is_ordered_and_deterministic(case in recommendation_case()) {
        let artifacts = artifact_set(
            case.rows,
            case.dim,
            &case.values,
            HashMap::from([(WARM_USER, case.clicks.clone())]),
            &case.popular,
        );

        let first =
            GenerateRecommendations::execute(&artifacts, UserId(WARM_USER), case.top_n).unwrap();
        let second =
            GenerateRecommendations::execute(&artifacts, UserId(WARM_USER), case.top_n).unwrap();
        prop_assert_eq!(&first, &second);

        for pair in first.recommendations.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (sa, sb) = (a.score.unwrap(), b.score.unwrap());
            let row_a = artifacts.row_of(a.article_id).unwrap();
            let row_b = artifacts.row_of(b.article_id).unwrap();

            prop_assert!((-1.0..=1.0).contains(&sa));
            prop_assert!(
                sb.total_cmp(&sa) == Ordering::Less
                    || (sa == sb && row_a < row_b),
                "out of order: row {} ({}) before row {} ({})",
                row_a, sa, row_b, sb
            );
        }
    }

    #[test]
    fn prop_matches_brute_force_reference(case in recommendation_case()) {
        let artifacts = artifact_set(
            case.rows,
            case.dim,
            &case.values,
            HashMap::from([(WARM_USER, case.clicks.clone())]),
            &case.popular,
        );

        let outcome =
            GenerateRecommendations::execute(&artifacts, UserId(WARM_USER), case.top_n).unwrap();
        let expected = reference(&case);

        let ids: Vec<u64> = outcome.recommendations.iter().map(|r| r.article_id).collect();
        let expected_ids: Vec<u64> = expected.iter().map(|r| r.article_id).collect();
        prop_assert_eq!(ids, expected_ids);

        for (got, want) in outcome.recommendations.iter().zip(&expected) {
            prop_assert!((got.score.unwrap() - want.score.unwrap()).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_cold_user_gets_popular_prefix(case in recommendation_case()) {
        let artifacts = artifact_set(
            case.rows,
            case.dim,
            &case.values,
            HashMap::from([(WARM_USER, case.clicks.clone())]),
            &case.popular,
        );

        let outcome =
            GenerateRecommendations::execute(&artifacts, UserId(COLD_USER), case.top_n).unwrap();

        let expected: Vec<Recommendation> = case
            .popular
            .iter()
            .take(case.top_n)
            .map(|&r| Recommendation::unscored(article_id(r)))
            .collect();

        prop_assert_eq!(outcome.source, RecommendationSource::Popularity);
        prop_assert_eq!(outcome.recommendations, expected);
    }
}
