//! Session token issuing and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. The server
//! keeps no session table: a token is valid until it expires.

use chrono::{Duration, Utc};
use hotelops_core::error::CoreError;
use hotelops_core::roles::Role;
use hotelops_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: DbId,
    pub role: Role,
    pub email: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier, for audit logs.
    pub jti: String,
}

/// Which login path issued the token; decides its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFlow {
    StaffLogin,
    GuestSession,
}

impl TokenFlow {
    pub fn for_role(role: Role) -> Self {
        if role.is_staff() {
            TokenFlow::StaffLogin
        } else {
            TokenFlow::GuestSession
        }
    }
}

/// Signing key and per-flow lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of [`TokenFlow::StaffLogin`] tokens (default: 24).
    pub staff_ttl_hours: i64,
    /// Lifetime of [`TokenFlow::GuestSession`] tokens (default: 7).
    pub guest_ttl_days: i64,
}

pub const DEFAULT_STAFF_TTL_HOURS: i64 = 24;
pub const DEFAULT_GUEST_TTL_DAYS: i64 = 7;

impl JwtConfig {
    pub fn ttl(&self, flow: TokenFlow) -> Duration {
        match flow {
            TokenFlow::StaffLogin => Duration::hours(self.staff_ttl_hours),
            TokenFlow::GuestSession => Duration::days(self.guest_ttl_days),
        }
    }
}

/// Issue a signed token for an identity.
pub fn issue_token(
    user_id: DbId,
    role: Role,
    email: &str,
    flow: TokenFlow,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        role,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + config.ttl(flow)).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry and return the claims.
///
/// No leeway is applied: a token is expired as soon as `now > exp`. Whether
/// the subject still exists is not checked here.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => CoreError::ExpiredToken,
        _ => CoreError::InvalidToken,
    })
}
