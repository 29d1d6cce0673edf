/// Signed session tokens
///
/// A logged-in session is carried in a cookie holding an HS256-signed JWT.
/// The token records who the user is and their role at login time, so
/// request guards can authorize without a database round trip.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use qbank_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
/// use qbank_shared::models::account::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-key-of-at-least-32-bytes!!";
/// let claims = SessionClaims::new(
///     Uuid::new_v4(),
///     Some("jane".to_string()),
///     "jane@example.com".to_string(),
///     Role::Student,
///     Duration::hours(24),
/// );
///
/// let token = create_session_token(&claims, secret)?;
/// let validated = validate_session_token(&token, secret)?;
/// assert_eq!(validated.email, "jane@example.com");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::Role;

/// Issuer claim stamped on every session token
pub const SESSION_ISSUER: &str = "qbank";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Token could not be signed
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Session has expired
    #[error("Session has expired")]
    Expired,

    /// Signature, issuer or format check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - account ID
    pub sub: Uuid,

    /// Issuer - always "qbank"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    pub username: Option<String>,
    pub email: String,
    pub role: Role,
}

impl SessionClaims {
    /// Creates claims valid for `ttl` from now
    pub fn new(
        account_id: Uuid,
        username: Option<String>,
        email: String,
        role: Role,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: account_id,
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
            username,
            email,
            role,
        }
    }

    /// Seconds left before the session expires (zero once expired)
    pub fn remaining_seconds(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// Signs session claims into a token
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Verifies a session token and returns its claims
///
/// Checks the signature, expiry, not-before time and issuer.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}
