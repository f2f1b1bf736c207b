//! User Profile Resolution
//!
//! A user's profile is the embedding of the article they clicked most
//! recently. It is derived per request and never stored.

use crate::artifacts::ArtifactSet;
use crate::types::{ArticleRow, UserId};
use ndarray::ArrayView1;

/// Profile of a user with click history, borrowed from the artifact set
#[derive(Debug, Clone)]
pub struct LastClickProfile<'a> {
    pub user_id: UserId,
    /// Row of the most recent click
    pub last_row: ArticleRow,
    pub vector: ArrayView1<'a, f32>,
    /// Every row the user clicked, oldest first
    pub clicked_rows: &'a [ArticleRow],
}

/// Resolve the last-click profile of a user
///
/// Steps:
/// 1. Look up the user's click history
/// 2. Unknown user or empty history means no profile (cold start)
/// 3. Otherwise return the embedding row of the last click
pub struct ResolveUserProfile;

impl ResolveUserProfile {
    pub fn execute(artifacts: &ArtifactSet, user_id: UserId) -> Option<LastClickProfile<'_>> {
        let clicked_rows = artifacts.clicks(user_id)?;
        let last_row = *clicked_rows.last()?;

        // Click rows are range-checked when the artifact set is built
        let vector = artifacts.embedding(last_row)?;

        Some(LastClickProfile {
            user_id,
            last_row,
            vector,
            clicked_rows,
        })
    }
}
