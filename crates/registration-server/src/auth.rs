//! Admin authentication.
//!
//! A single admin identity is configured by username and password. A
//! successful login yields an HS256 JWT carrying the username, the `admin`
//! role and an absolute expiry. Tokens are verified statelessly on every
//! request; there is no session store and no revocation.

use axum::http::HeaderValue;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Role claim carried by every admin token.
pub const ADMIN_ROLE: &str = "admin";

/// Claims of an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub username: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly issued token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: AdminClaims,
}

/// Authentication failures.
///
/// The variants are for server-side logging; clients see a single
/// "unauthorized" outcome for all token failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing authorization header")]
    MissingHeader,
    #[error("invalid authorization format")]
    InvalidFormat,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("unexpected role: {0}")]
    WrongRole(String),
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Hash a secret using SHA-256.
fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Credential check and token issuance for the single admin account.
#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password_hash: String,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
    token_ttl: Duration,
}

impl AdminAuth {
    /// Create from the configured admin credentials and signing secret.
    pub fn new(
        username: impl Into<String>,
        password: &SecretString,
        jwt_secret: &SecretString,
        token_ttl: Duration,
    ) -> Self {
        let secret_bytes = jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            username: username.into(),
            password_hash: hash_secret(password.expose_secret()),
            encoding_key: Arc::new(EncodingKey::from_secret(secret_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret_bytes)),
            validation,
            token_ttl,
        }
    }

    /// Check credentials and issue a token valid for the configured TTL.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let username_ok = hash_secret(username) == hash_secret(&self.username);
        let password_ok = hash_secret(password) == self.password_hash;

        if !(username_ok && password_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(Utc::now())
    }

    /// Issue a token as if at `issued_at`.
    pub fn issue_token(&self, issued_at: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let claims = AdminClaims {
            username: self.username.clone(),
            role: ADMIN_ROLE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.token_ttl).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature, expiry and role of a token.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let token_data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.role != ADMIN_ROLE {
            return Err(AuthError::WrongRole(claims.role));
        }

        Ok(claims)
    }

    /// Verify the token in an `Authorization: Bearer <token>` header.
    pub fn verify_header(&self, header: Option<&HeaderValue>) -> Result<AdminClaims, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let value = header.to_str().map_err(|_| AuthError::InvalidFormat)?;

        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::InvalidFormat)?;

        if token.is_empty() {
            return Err(AuthError::MissingHeader);
        }

        self.verify(token)
    }
}
