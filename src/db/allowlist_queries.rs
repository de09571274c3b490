use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// One permitted sign-in address, with optional operator metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AllowedEmail {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub shop: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn row_to_entry(r: sqlx::postgres::PgRow) -> Result<AllowedEmail, sqlx::Error> {
    Ok(AllowedEmail {
        id: r.try_get("id")?,
        email: r.try_get("email")?,
        name: r.try_get("name")?,
        shop: r.try_get("shop")?,
        created_at: r.try_get("created_at")?,
    })
}

/// List all allowlist entries, oldest first.
pub async fn list(pool: &PgPool) -> Result<Vec<AllowedEmail>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, email, name, shop, created_at
        FROM allowed_emails
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_entry).collect()
}

/// Insert a new permitted email. The email is stored lowercased; a
/// duplicate insert surfaces as a unique violation for the caller to map.
pub async fn insert(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
    shop: Option<&str>,
) -> Result<AllowedEmail, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO allowed_emails (email, name, shop)
        VALUES (LOWER($1), $2, $3)
        RETURNING id, email, name, shop, created_at
        "#,
    )
    .bind(email.trim())
    .bind(name)
    .bind(shop)
    .fetch_one(pool)
    .await?;

    row_to_entry(row)
}

/// Delete by identifier. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM allowed_emails WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Membership check used by the login gate.
pub async fn is_allowed(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM allowed_emails WHERE email = LOWER($1))")
        .bind(email.trim())
        .fetch_one(pool)
        .await?;

    row.try_get(0)
}
