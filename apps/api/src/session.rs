//! Request-scoped session context.
//!
//! Sessions are issued by the external auth provider as HS256 bearer tokens.
//! Handlers that need a caller take `Session` (401 when absent or invalid);
//! handlers where the caller is optional take `Option<Session>`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub is_verified: bool,
    pub exp: i64,
    pub iat: i64,
}

fn default_role() -> String {
    "user".to_string()
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Authoring needs an account whose email the auth provider has verified.
    pub fn require_verified(&self) -> Result<(), AppError> {
        if self.is_verified {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Please verify your email before publishing".to_string(),
            ))
        }
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            is_verified: claims.is_verified,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies signature and expiry and returns the session.
pub fn decode_session(token: &str, secret: &str) -> Result<Session, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.into())
    .map_err(|e| {
        debug!("Rejected session token: {e}");
        AppError::Unauthorized
    })
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        decode_session(token, &state.config.session_secret)
    }
}

/// Signs a token the way the auth provider does.
#[cfg(test)]
pub fn issue_token(session: &Session, secret: &str, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: session.user_id,
        email: session.email.clone(),
        role: session.role.clone(),
        is_verified: session.is_verified,
        exp: now + ttl_secs,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sample() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: "writer@example.com".to_string(),
            role: "user".to_string(),
            is_verified: true,
        }
    }

    #[test]
    fn test_decode_round_trips_claims() {
        let session = sample();
        let token = issue_token(&session, "secret", 60);
        let decoded = decode_session(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, session.user_id);
        assert_eq!(decoded.email, session.email);
        assert!(decoded.is_verified);
        assert!(!decoded.is_admin());
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = issue_token(&sample(), "secret", 60);
        assert!(matches!(
            decode_session(&token, "other"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        // Well past the default 60s leeway.
        let token = issue_token(&sample(), "secret", -3600);
        assert!(decode_session(&token, "secret").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_require_admin() {
        let mut session = sample();
        assert!(matches!(session.require_admin(), Err(AppError::Forbidden(_))));
        session.role = ADMIN_ROLE.to_string();
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn test_require_verified() {
        let mut session = sample();
        assert!(session.require_verified().is_ok());
        session.is_verified = false;
        assert!(matches!(
            session.require_verified(),
            Err(AppError::Forbidden(_))
        ));
    }
}
