//! Single-check result polling.
//!
//! Each poll is one lookup, no internal retry or backoff: the caller owns
//! the interval and the give-up threshold. A job the caller stops polling
//! is simply abandoned client-side; the engine may still complete it.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::content::ContentRecord;
use crate::models::job::StoredResult;
use crate::services::normalizer::{self, Normalized};
use crate::services::result_store::{ResultStore, StoreError};

/// Outcome of one poll call.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No stored record yet, or a record in a non-terminal state.
    Pending,
    /// Terminal success: the stored payload, normalized.
    Completed(Normalized),
    /// Terminal failure reported by the engine.
    Failed { message: String },
}

pub struct ResultPoller {
    store: Arc<ResultStore>,
    db: PgPool,
}

impl ResultPoller {
    pub fn new(store: Arc<ResultStore>, db: PgPool) -> Self {
        Self { store, db }
    }

    /// One lookup for a job's result. The hot store is consulted first;
    /// when it is unreachable the durable store serves the same key. A miss
    /// in a reachable store means the job is still pending — not an error.
    pub async fn poll(&self, job_id: Uuid) -> Result<PollOutcome, PollError> {
        let stored = match self.store.get(job_id).await {
            Ok(found) => found,
            Err(err) => {
                warn!(%job_id, error = %err, "hot result store unreachable, falling back to durable store");
                queries::get_result(&self.db, job_id).await?
            }
        };

        let Some(stored) = stored else {
            debug!(%job_id, "no stored result yet");
            return Ok(PollOutcome::Pending);
        };

        Ok(Self::outcome(job_id, stored))
    }

    fn outcome(job_id: Uuid, stored: StoredResult) -> PollOutcome {
        use crate::models::job::JobStatus;

        match stored.status {
            JobStatus::Completed => {
                let normalized = match stored.payload() {
                    Some(payload) => normalizer::normalize(&payload),
                    None => Normalized::Record(ContentRecord::default()),
                };
                debug!(%job_id, "job completed, payload normalized");
                PollOutcome::Completed(normalized)
            }
            JobStatus::Failed => PollOutcome::Failed {
                message: stored
                    .result
                    .unwrap_or_else(|| "generation failed".to_string()),
            },
            // Non-terminal status is equivalent to a miss.
            JobStatus::Pending | JobStatus::Processing => PollOutcome::Pending,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Durable result store lookup failed: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),
}
