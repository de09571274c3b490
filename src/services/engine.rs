//! Webhook client for the external AI generation engine.
//!
//! Two interaction modes: a synchronous call that blocks for the full
//! generation (minutes), and an asynchronous fire-and-forget submission
//! where the client mints the job id up front and the result arrives later
//! through the callback relay.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::content::ContentRecord;
use crate::models::history::ModificationHistoryEntry;
use crate::services::normalizer::{self, Normalized};

/// Cloudflare's gateway-timeout status. The proxy may cut the connection
/// while the origin still produced a full body, so a 524 with a non-trivial
/// body is treated as possibly successful.
const DEGRADED_TIMEOUT_STATUS: u16 = 524;

/// Minimum body size for a degraded-timeout response to be worth parsing.
const MIN_DEGRADED_BODY_BYTES: usize = 100;

/// Webhook request discriminator.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Generate,
    Modify,
}

/// Outbound webhook body.
#[derive(Debug, Serialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub data: Value,
    /// Present only in asynchronous mode; minted by this client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

/// The `data` object of a `modify` request: the edit instruction plus the
/// full version history so the engine sees every prior revision.
#[derive(Debug, Serialize)]
pub struct ModificationData {
    pub current_request: String,
    pub modification_history: Vec<ModificationHistoryEntry>,
    pub original_content: Option<ContentRecord>,
    pub current_content: Option<ContentRecord>,
}

pub struct EngineClient {
    http: Client,
    webhook_url: String,
    read_timeout: Duration,
    ack_timeout: Duration,
}

impl EngineClient {
    pub fn new(
        webhook_url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
        ack_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("copymill/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(EngineError::Http)?;

        Ok(Self {
            http,
            webhook_url: webhook_url.into(),
            read_timeout,
            ack_timeout,
        })
    }

    /// Synchronous mode: block on the webhook call for the full generation.
    ///
    /// HTTP 200 is success-with-body. A 524 that still carries a
    /// non-trivial body is normalized anyway rather than discarded.
    pub async fn submit_sync(&self, envelope: &WebhookEnvelope) -> Result<Normalized, EngineError> {
        let started = std::time::Instant::now();
        let response = self
            .http
            .post(&self.webhook_url)
            .timeout(self.read_timeout)
            .json(envelope)
            .send()
            .await
            .map_err(EngineError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(EngineError::Http)?;
        info!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "engine responded"
        );

        if status == StatusCode::OK {
            metrics::counter!("engine_requests_total", "mode" => "sync", "outcome" => "ok")
                .increment(1);
            return Ok(normalize_body(&body));
        }

        if status.as_u16() == DEGRADED_TIMEOUT_STATUS {
            if body.len() > MIN_DEGRADED_BODY_BYTES {
                warn!("gateway timeout with a usable body, attempting normalization");
                metrics::counter!("engine_requests_total", "mode" => "sync", "outcome" => "degraded")
                    .increment(1);
                return Ok(normalize_body(&body));
            }
            return Err(EngineError::GatewayTimeout);
        }

        metrics::counter!("engine_requests_total", "mode" => "sync", "outcome" => "error")
            .increment(1);
        Err(EngineError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }

    /// Asynchronous mode: mint a job id, attach it to the request, send with
    /// a short timeout expecting only an acknowledgement, and return the id
    /// immediately. The result arrives out of band and is picked up by
    /// polling.
    pub async fn submit_async(&self, kind: RequestKind, data: Value) -> Result<Uuid, EngineError> {
        let job_id = Uuid::new_v4();
        let envelope = WebhookEnvelope {
            kind,
            data,
            job_id: Some(job_id),
        };

        let response = self
            .http
            .post(&self.webhook_url)
            .timeout(self.ack_timeout)
            .json(&envelope)
            .send()
            .await
            .map_err(EngineError::Http)?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::ACCEPTED => {
                let body = response.text().await.unwrap_or_default();
                if body.contains("processing") {
                    info!(%job_id, "engine acknowledged, job processing");
                }
                metrics::counter!("engine_requests_total", "mode" => "async", "outcome" => "ok")
                    .increment(1);
                Ok(job_id)
            }
            other => Err(EngineError::Status {
                status: other.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_default()
                    .chars()
                    .take(200)
                    .collect(),
            }),
        }
    }

    /// Async submission plus a pending record in the durable store, so the
    /// job is pollable from Postgres even before any callback arrives. The
    /// bookkeeping write is best-effort: the callback relay writes the same
    /// key anyway, so a failure here only loses the request echo.
    pub async fn submit_async_recorded(
        &self,
        pool: &PgPool,
        kind: RequestKind,
        data: Value,
    ) -> Result<Uuid, EngineError> {
        let request_payload = serde_json::json!({ "type": kind, "data": data.clone() });
        let job_id = self.submit_async(kind, data).await?;
        if let Err(e) = queries::create_job(pool, job_id, &request_payload).await {
            warn!(%job_id, error = %e, "failed to record pending job in durable store");
        }
        Ok(job_id)
    }
}

/// Normalize a response body: JSON when it parses, otherwise the text
/// wrapped the way the engine would wrap plain output.
fn normalize_body(body: &str) -> Normalized {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalizer::normalize(&value),
        Err(_) => normalizer::normalize(&serde_json::json!({ "content": body })),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine gateway timed out with no usable body; the job may still complete, retry or refresh shortly")]
    GatewayTimeout,

    #[error("Engine returned unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl EngineError {
    /// Transport-class failures are transient: the session survives and the
    /// user should simply retry.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Http(_) | EngineError::GatewayTimeout => true,
            EngineError::Status { status, .. } => *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_discriminator() {
        let envelope = WebhookEnvelope {
            kind: RequestKind::Generate,
            data: serde_json::json!({"platform": "instagram"}),
            job_id: None,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["type"], "generate");
        assert!(value.get("job_id").is_none());
    }

    #[test]
    fn test_envelope_carries_job_id_in_async_mode() {
        let job_id = Uuid::new_v4();
        let envelope = WebhookEnvelope {
            kind: RequestKind::Modify,
            data: serde_json::json!({}),
            job_id: Some(job_id),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["type"], "modify");
        assert_eq!(value["job_id"], job_id.to_string());
    }

    #[test]
    fn test_normalize_body_json() {
        let body = r#"{"output": "[후킹문구]\nH\n[캡션]\nC"}"#;
        let record = normalize_body(body).into_record().unwrap();
        assert_eq!(record.headline, "H");
    }

    #[test]
    fn test_normalize_body_plain_text() {
        let body = "[후킹문구]\nH\n[캡션]\nC";
        let record = normalize_body(body).into_record().unwrap();
        assert_eq!(record.headline, "H");
        assert_eq!(record.caption, "C");
    }

    #[test]
    fn test_transient_classification() {
        assert!(EngineError::GatewayTimeout.is_transient());
        assert!(EngineError::Status {
            status: 502,
            body: String::new()
        }
        .is_transient());
        assert!(!EngineError::Status {
            status: 400,
            body: String::new()
        }
        .is_transient());
    }
}
