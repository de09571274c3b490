use copymill::{
    config::AppConfig,
    db::{self, allowlist_queries, queries},
    models::brief::{CampaignBrief, Platform},
    models::content::ContentRecord,
    models::job::{JobStatus, StoredResult},
    services::normalizer::{self, Normalized},
    services::poller::{PollOutcome, ResultPoller},
    services::result_store::ResultStore,
    session::SessionContext,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Integration test: full result-relay flow
///
/// This test verifies the complete integration:
/// 1. Database connection and schema
/// 2. Job creation and result upsert (durable store)
/// 3. Redis result store (put/get)
/// 4. Polling: pending, then completed with a normalized payload
/// 5. Allowlist operations (insert/list/check/delete)
///
/// Note: This requires a running PostgreSQL and Redis instance
/// configured via environment variables.
#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_full_integration() {
    // Load config from environment
    let config = AppConfig::from_env().expect("Failed to load config");

    // Initialize database
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    // Initialize Redis store
    let store =
        Arc::new(ResultStore::new(&config.redis_url).expect("Failed to initialize result store"));
    let poller = ResultPoller::new(store.clone(), db_pool.clone());

    // 1. Create a job, as the async submission path would
    let job_id = Uuid::new_v4();
    let request = serde_json::json!({"type": "generate", "data": {"platform": "instagram"}});
    queries::create_job(&db_pool, job_id, &request)
        .await
        .expect("Failed to create job");

    let job = queries::get_job(&db_pool, job_id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.request_payload["type"], "generate");

    // 2. Poll before any result arrives
    let outcome = poller.poll(job_id).await.expect("Poll failed");
    assert_eq!(outcome, PollOutcome::Pending);

    // 3. Store a completed result in both stores, as the callback does
    let stored = StoredResult {
        status: JobStatus::Completed,
        result: None,
        result_data: Some(serde_json::json!({
            "data": {
                "headline": "Glow up",
                "caption": "Visit us today",
                "hashtags": ["#glow"],
                "blog_title": "Glow up",
                "blog_content": "Visit us today"
            }
        })),
        received_at: Utc::now(),
    };
    store.put(job_id, &stored).await.expect("Redis put failed");
    queries::upsert_result(&db_pool, job_id, &stored)
        .await
        .expect("Result upsert failed");

    // 4. Read back through the hot store
    let from_store = store
        .get(job_id)
        .await
        .expect("Redis get failed")
        .expect("Result missing from store");
    assert_eq!(from_store.status, JobStatus::Completed);

    // 5. Poll again: completed, normalized
    match poller.poll(job_id).await.expect("Poll failed") {
        PollOutcome::Completed(normalized) => {
            let record = normalized.into_record().expect("Expected a record");
            assert_eq!(record.headline, "Glow up");
            assert_eq!(record.hashtags, vec!["#glow".to_string()]);
        }
        other => panic!("expected completion, got {other:?}"),
    }

    // 6. A duplicate callback overwrites (last write wins)
    let overwrite = StoredResult {
        status: JobStatus::Failed,
        result: Some("engine error".to_string()),
        result_data: None,
        received_at: Utc::now(),
    };
    queries::upsert_result(&db_pool, job_id, &overwrite)
        .await
        .expect("Overwrite failed");
    store
        .put(job_id, &overwrite)
        .await
        .expect("Redis overwrite failed");

    match poller.poll(job_id).await.expect("Poll failed") {
        PollOutcome::Failed { message } => assert_eq!(message, "engine error"),
        other => panic!("expected failure, got {other:?}"),
    }

    // 7. Allowlist round trip
    let email = format!("it-{}@example.com", Uuid::new_v4());
    let entry = allowlist_queries::insert(&db_pool, &email, Some("Test User"), None)
        .await
        .expect("Allowlist insert failed");
    assert_eq!(entry.email, email);

    assert!(allowlist_queries::is_allowed(&db_pool, &email)
        .await
        .expect("Allowlist check failed"));

    let entries = allowlist_queries::list(&db_pool)
        .await
        .expect("Allowlist list failed");
    assert!(entries.iter().any(|e| e.id == entry.id));

    assert!(allowlist_queries::delete(&db_pool, entry.id)
        .await
        .expect("Allowlist delete failed"));
    assert!(!allowlist_queries::is_allowed(&db_pool, &email)
        .await
        .expect("Allowlist check failed"));

    println!("✅ All integration tests passed!");
}

/// The durable store serves a poll when Redis is unreachable: same job id,
/// same record, answered from Postgres.
///
/// Note: This requires a running PostgreSQL instance configured via
/// environment variables; Redis is deliberately not reachable here.
#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_poll_falls_back_to_durable_store() {
    let config = AppConfig::from_env().expect("Failed to load config");

    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    let job_id = Uuid::new_v4();
    let stored = StoredResult {
        status: JobStatus::Completed,
        result: None,
        result_data: Some(serde_json::json!({
            "data": {"headline": "From Postgres", "caption": "Durable body"}
        })),
        received_at: Utc::now(),
    };
    queries::upsert_result(&db_pool, job_id, &stored)
        .await
        .expect("Result upsert failed");

    // Nothing listens on this port, so every hot-store call errors out.
    let dead_store =
        Arc::new(ResultStore::new("redis://127.0.0.1:1/").expect("Failed to build store"));
    let poller = ResultPoller::new(dead_store, db_pool);

    match poller.poll(job_id).await.expect("Poll failed") {
        PollOutcome::Completed(normalized) => {
            let record = normalized.into_record().expect("Expected a record");
            assert_eq!(record.headline, "From Postgres");
            assert_eq!(record.caption, "Durable body");
        }
        other => panic!("expected completion from the durable store, got {other:?}"),
    }

    // An unknown id through the same dead store is still just pending.
    let outcome = poller.poll(Uuid::new_v4()).await.expect("Poll failed");
    assert_eq!(outcome, PollOutcome::Pending);
}

fn brief() -> CampaignBrief {
    CampaignBrief {
        platform: Platform::Instagram,
        age_group: "30s".to_string(),
        gender: "female".to_string(),
        concern: "dry skin".to_string(),
        message: "new treatment available".to_string(),
        phone: "02-1234-5678".to_string(),
        region: "Seoul".to_string(),
        shop_name: "Glow Studio".to_string(),
    }
}

/// Test the full session lifecycle against normalized engine output:
/// generate, revise, then restore an earlier version.
#[test]
fn test_session_generate_modify_restore_flow() {
    let raw = serde_json::json!({
        "output": "[후킹문구]\n피부가 달라져요\n[캡션]\n지금 예약하세요\n[해시태그]\n#피부관리 #에스테틱"
    });
    let record = match normalizer::normalize(&raw) {
        Normalized::Record(record) => record,
        Normalized::Raw(other) => panic!("expected a record, got {other}"),
    };

    let mut session = SessionContext::new();
    session.authenticate("user@example.com", "token");
    session
        .accept_generation(brief(), record)
        .expect("Generation rejected");
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.current().unwrap().headline, "피부가 달라져요");

    // Apply an engine revision
    let mut revised = session.current().unwrap().clone();
    revised.caption = "이번 주만 할인 예약".to_string();
    session
        .apply_modification(revised, "add a discount hook")
        .expect("Modification rejected");
    assert_eq!(session.ledger().len(), 2);

    // The modify payload carries the whole history
    let data = session
        .build_modification("shorter please")
        .expect("No content");
    assert_eq!(data.modification_history.len(), 2);
    assert_eq!(
        data.original_content.unwrap().caption,
        "지금 예약하세요"
    );

    // Restore v1 as a new version
    let new_version = session.restore(1).expect("Restore failed");
    assert_eq!(new_version, 3);
    assert_eq!(session.current().unwrap().caption, "지금 예약하세요");
    assert_eq!(session.ledger().len(), 3);
}

/// Stored results normalize the same way whether the payload came in as
/// structured data or as raw text.
#[test]
fn test_stored_result_payload_normalization() {
    let structured = StoredResult {
        status: JobStatus::Completed,
        result: None,
        result_data: Some(serde_json::json!({"data": {"headline": "H", "caption": "C"}})),
        received_at: Utc::now(),
    };
    let record = normalizer::normalize(&structured.payload().unwrap())
        .into_record()
        .unwrap();
    assert_eq!(record.headline, "H");

    let textual = StoredResult {
        status: JobStatus::Completed,
        result: Some("[제목]\nBlog title\n[본문]\nBody text\n[태그]\n#tag".to_string()),
        result_data: None,
        received_at: Utc::now(),
    };
    let record = normalizer::normalize(&textual.payload().unwrap())
        .into_record()
        .unwrap();
    assert_eq!(record.blog_title, "Blog title");
    assert_eq!(record.blog_content, "Body text");
    assert_eq!(record.hashtags, vec!["#tag".to_string()]);
}

/// A record missing both body fields is rejected before it can enter a
/// session, and the session keeps its prior state.
#[test]
fn test_invalid_record_never_enters_session() {
    let mut session = SessionContext::new();
    let mut record = ContentRecord::default();
    record.headline = "only a headline".to_string();

    assert!(session.accept_generation(brief(), record).is_err());
    assert!(session.current().is_none());
    assert_eq!(session.ledger().len(), 0);
}
