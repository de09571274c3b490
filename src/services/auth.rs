use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Bearer-token claims for one interactive session.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated email address.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issues and verifies HS256 session tokens for allowlisted users.
///
/// Membership itself lives in the `allowed_emails` table; this service only
/// turns a verified email into a bearer token and back.
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    admin_email: String,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(secret: &str, admin_email: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            admin_email: admin_email.into(),
            session_ttl: Duration::days(7),
        }
    }

    pub fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_lowercase(),
            exp: (now + self.session_ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::Token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AuthError::Token)
    }

    pub fn is_admin(&self, claims: &Claims) -> bool {
        claims.sub.eq_ignore_ascii_case(&self.admin_email)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid or expired token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Email address is not on the allowlist")]
    NotAllowed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret-for-unit-tests", "admin@example.com")
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let auth = service();
        let token = auth.issue_token("User@Example.com").unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = service();
        let mut token = auth.issue_token("user@example.com").unwrap();
        token.push('x');
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue_token("user@example.com").unwrap();
        let other = AuthService::new("different-secret", "admin@example.com");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_admin_detection_case_insensitive() {
        let auth = service();
        let token = auth.issue_token("Admin@Example.com").unwrap();
        let claims = auth.verify(&token).unwrap();
        assert!(auth.is_admin(&claims));

        let token = auth.issue_token("someone@example.com").unwrap();
        assert!(!auth.is_admin(&auth.verify(&token).unwrap()));
    }
}
