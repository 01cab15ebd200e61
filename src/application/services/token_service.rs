use crate::domain::entities::{Fields, Principal};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Fixed validity window of an issued token
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Issues and verifies stateless HS256 session tokens. Nothing is stored
/// server-side; the signed claims are the whole session.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign whatever user object the caller sent. Its shape is not checked;
    /// `iat` and `exp` are always set by the issuer.
    pub fn issue(&self, user: Fields) -> DomainResult<String> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::days(TOKEN_TTL_DAYS);

        let mut claims = user;
        claims.insert("iat".to_string(), Value::from(issued_at.timestamp()));
        claims.insert("exp".to_string(), Value::from(expires_at.timestamp()));

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal(format!("Token encoding failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> DomainResult<Principal> {
        let token_data = decode::<Fields>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            DomainError::Unauthorized
        })?;

        let mut claims = token_data.claims;
        claims.remove("iat");
        claims.remove("exp");
        Ok(Principal::new(claims))
    }
}
