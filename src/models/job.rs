use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Status of a generation/modification job tracked in the result stores.
/// A job never transitions backward; abandoning one client-side just stops
/// polling, the engine may still complete it with no observable effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A generation/modification job as persisted in the durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub status: JobStatus,
    /// Opaque echo of the submitted form/modification data.
    pub request_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the engine's completion callback writes and the polling client
/// reads, in both the hot and the durable store. A duplicate notification
/// for the same job id overwrites this wholesale (last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub status: JobStatus,
    /// Free-text output, when the engine reports it as plain text.
    pub result: Option<String>,
    /// Structured output, preferred over `result` when present.
    pub result_data: Option<serde_json::Value>,
    pub received_at: DateTime<Utc>,
}

impl StoredResult {
    /// The payload to hand to the normalizer: structured data when present,
    /// otherwise the raw text wrapped the way the engine would have sent it.
    pub fn payload(&self) -> Option<serde_json::Value> {
        if let Some(data) = &self.result_data {
            return Some(data.clone());
        }
        self.result
            .as_ref()
            .map(|text| serde_json::json!({ "content": text }))
    }
}
