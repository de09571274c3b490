use redis::AsyncCommands;
use uuid::Uuid;

use crate::models::job::StoredResult;

const RESULT_KEY_PREFIX: &str = "copymill:result:";

/// Redis-backed hot store for job results, keyed by job id.
///
/// The durable Postgres store holds the same records under the same key so
/// either side can serve a lookup; this one is just the fast path.
pub struct ResultStore {
    client: redis::Client,
}

impl ResultStore {
    pub fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url).map_err(StoreError::Redis)?;
        Ok(Self { client })
    }

    fn key(job_id: Uuid) -> String {
        format!("{RESULT_KEY_PREFIX}{job_id}")
    }

    /// Insert or overwrite the result for a job. Duplicate callbacks for the
    /// same job id overwrite wholesale — last write wins.
    pub async fn put(&self, job_id: Uuid, result: &StoredResult) -> Result<(), StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Redis)?;
        let payload = serde_json::to_string(result).map_err(StoreError::Serialize)?;
        conn.set::<_, _, ()>(Self::key(job_id), payload)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }

    /// Point lookup by job id. A miss is `Ok(None)`, not an error.
    pub async fn get(&self, job_id: Uuid) -> Result<Option<StoredResult>, StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Redis)?;
        let payload: Option<String> = conn
            .get(Self::key(job_id))
            .await
            .map_err(StoreError::Redis)?;

        match payload {
            Some(json) => {
                let stored = serde_json::from_str(&json).map_err(StoreError::Serialize)?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// Check Redis connectivity (for health checks).
    pub async fn health_check(&self) -> Result<(), StoreError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Redis)?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
