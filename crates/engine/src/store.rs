//! Process-wide artifact holder with atomic refresh
//!
//! Requests take an `Arc<ArtifactSet>` snapshot and score against it without
//! further locking. A reload decodes and validates a complete new set on the
//! blocking pool before swapping it in, so a request sees either the old set
//! or the new one, never a mix. Reloads are serialized, so the last one to
//! start is the last one to swap.

use crate::artifacts::{ArtifactSet, ArtifactStats};
use crate::error::ArtifactError;
use crate::loader::{load_artifact_set, ArtifactSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct ArtifactStore {
    source: Arc<dyn ArtifactSource>,
    current: RwLock<Arc<ArtifactSet>>,
    reload_lock: Mutex<()>,
}

impl ArtifactStore {
    /// Wrap an already loaded set
    pub fn new(source: Arc<dyn ArtifactSource>, initial: ArtifactSet) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(initial)),
            reload_lock: Mutex::new(()),
        }
    }

    /// Load the initial set from `source`.
    ///
    /// # Errors
    ///
    /// Any artifact failure is returned as-is; callers treat it as fatal.
    pub async fn load(source: Arc<dyn ArtifactSource>) -> Result<Self, ArtifactError> {
        let initial = Self::load_blocking(Arc::clone(&source)).await?;
        Ok(Self::new(source, initial))
    }

    /// Current artifact set
    pub async fn snapshot(&self) -> Arc<ArtifactSet> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the current set with a freshly loaded one.
    ///
    /// On failure the current set stays in service. Concurrent callers wait
    /// for the reload in progress before reading the source themselves.
    pub async fn reload(&self) -> Result<ArtifactStats, ArtifactError> {
        let _guard = self.reload_lock.lock().await;

        let fresh = Self::load_blocking(Arc::clone(&self.source)).await?;
        let stats = fresh.stats();

        *self.current.write().await = Arc::new(fresh);

        info!(
            articles = stats.articles,
            users = stats.users,
            dimension = stats.dimension,
            "Artifact set swapped"
        );

        Ok(stats)
    }

    /// Reload every `interval` until the returned handle is aborted
    pub fn spawn_refresh(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately; the initial set is already loaded
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.reload().await {
                    error!(error = %e, "Periodic artifact refresh failed, keeping previous set");
                }
            }
        })
    }

    async fn load_blocking(source: Arc<dyn ArtifactSource>) -> Result<ArtifactSet, ArtifactError> {
        tokio::task::spawn_blocking(move || load_artifact_set(source.as_ref()))
            .await
            .map_err(|e| ArtifactError::Task(e.to_string()))?
    }
}
