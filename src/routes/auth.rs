use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::db::allowlist_queries;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// POST /api/auth/login — exchange an allowlisted email for a session token.
/// There is no password; the allowlist is the credential.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let email = request.email.trim().to_lowercase();
    if !looks_like_email(&email) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let allowed = allowlist_queries::is_allowed(&state.db, &email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "allowlist lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !allowed {
        tracing::info!(%email, "login rejected, not on allowlist");
        metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
        return Err(StatusCode::FORBIDDEN);
    }

    let token = state.auth.issue_token(&email).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    metrics::counter!("logins_total", "outcome" => "accepted").increment(1);
    tracing::info!(%email, "login accepted");

    Ok(Json(LoginResponse { token, email }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape_check() {
        assert!(looks_like_email("user@example.com"));
        assert!(looks_like_email("  user@example.com  "));
        assert!(!looks_like_email("user"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("user@nodot"));
        assert!(!looks_like_email("user@.com"));
    }
}
