use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::allowlist_queries::{self, AllowedEmail};
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
pub struct AddEmailRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
}

/// Extract and verify the bearer token, then require the admin identity.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Claims, StatusCode> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state
        .auth
        .verify(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    if !state.auth.is_admin(&claims) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(claims)
}

/// GET /api/admin/allowlist — list permitted sign-in addresses.
pub async fn list_allowlist(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AllowedEmail>>, StatusCode> {
    require_admin(&state, &headers)?;

    let entries = allowlist_queries::list(&state.db).await.map_err(|e| {
        tracing::error!(error = %e, "allowlist list failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(entries))
}

/// POST /api/admin/allowlist — add an address. Duplicates are a 409.
pub async fn add_to_allowlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddEmailRequest>,
) -> Result<(StatusCode, Json<AllowedEmail>), StatusCode> {
    let claims = require_admin(&state, &headers)?;

    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(StatusCode::BAD_REQUEST);
    }

    let entry = allowlist_queries::insert(
        &state.db,
        &request.email,
        request.name.as_deref(),
        request.shop.as_deref(),
    )
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StatusCode::CONFLICT;
            }
        }
        tracing::error!(error = %e, "allowlist insert failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(admin = %claims.sub, email = %entry.email, "allowlist entry added");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/admin/allowlist/{id} — remove an address by identifier.
pub async fn remove_from_allowlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let claims = require_admin(&state, &headers)?;

    let removed = allowlist_queries::delete(&state.db, id).await.map_err(|e| {
        tracing::error!(error = %e, "allowlist delete failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if !removed {
        return Err(StatusCode::NOT_FOUND);
    }

    tracing::info!(admin = %claims.sub, %id, "allowlist entry removed");
    Ok(StatusCode::NO_CONTENT)
}
