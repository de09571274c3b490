use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::job::{JobRecord, JobStatus, StoredResult};

/// Insert a new job in `pending` with its request payload echoed. Inserting
/// an already-known job id is a no-op (the record is created once, at
/// submission time).
pub async fn create_job(
    pool: &PgPool,
    job_id: Uuid,
    request_payload: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO job_results (job_id, status, request_payload)
        VALUES ($1, 'pending', $2)
        ON CONFLICT (job_id) DO NOTHING
        "#,
    )
    .bind(job_id)
    .bind(request_payload)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a job by id
pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT job_id, status, request_payload, created_at, updated_at
        FROM job_results
        WHERE job_id = $1
        "#,
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(r) => {
            let status_str: String = r.try_get("status")?;
            Some(JobRecord {
                job_id: r.try_get("job_id")?,
                status: status_str.parse().unwrap_or(JobStatus::Pending),
                request_payload: r
                    .try_get::<Option<serde_json::Value>, _>("request_payload")?
                    .unwrap_or(serde_json::Value::Null),
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            })
        }
        None => None,
    })
}

/// Write a result notification for a job. Keyed by job id with
/// last-write-wins semantics: a duplicate notification overwrites the
/// prior stored result, there is no idempotency token.
pub async fn upsert_result(
    pool: &PgPool,
    job_id: Uuid,
    stored: &StoredResult,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO job_results (job_id, status, result, result_data, received_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (job_id) DO UPDATE
        SET status = EXCLUDED.status,
            result = EXCLUDED.result,
            result_data = EXCLUDED.result_data,
            received_at = EXCLUDED.received_at,
            updated_at = NOW()
        "#,
    )
    .bind(job_id)
    .bind(stored.status.to_string())
    .bind(&stored.result)
    .bind(&stored.result_data)
    .bind(stored.received_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the stored result for a job, if any notification has arrived.
/// Serves as the durable fallback when the hot store is unreachable — both
/// stores are keyed by the same job id.
pub async fn get_result(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Option<StoredResult>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT status, result, result_data, received_at, updated_at
        FROM job_results
        WHERE job_id = $1
        "#,
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some(r) => {
            let status_str: String = r.try_get("status")?;
            let received_at: Option<DateTime<Utc>> = r.try_get("received_at")?;
            let updated_at: DateTime<Utc> = r.try_get("updated_at")?;
            Some(StoredResult {
                status: status_str.parse().unwrap_or(JobStatus::Pending),
                result: r.try_get("result")?,
                result_data: r.try_get("result_data")?,
                received_at: received_at.unwrap_or(updated_at),
            })
        }
        None => None,
    })
}
