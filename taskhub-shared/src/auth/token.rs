//! Access token issuing and validation.
//!
//! Tokens are JWTs signed with HS256. All signing state lives in a
//! [`TokenIssuer`] built from application config: the secret and the default
//! lifetime are injected at construction, never read from the environment,
//! and there is no fallback secret.
//!
//! # Example
//!
//! ```
//! use taskhub_shared::auth::token::TokenIssuer;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let issuer = TokenIssuer::new("a-secret-that-is-at-least-32-bytes!!", Duration::minutes(60));
//!
//! let user_id = Uuid::new_v4();
//! let token = issuer.issue(user_id)?;
//!
//! let claims = issuer.validate(&token)?;
//! assert_eq!(claims.sub, user_id);
//! # Ok(())
//! # }
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
const ISSUER: &str = "taskhub";

/// Error type for token operations
///
/// `Expired`, `InvalidSignature` and `Malformed` are the three rejection
/// reasons a caller can meaningfully distinguish; everything the jsonwebtoken
/// crate reports beyond those collapses into `Malformed`.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the configured secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token is structurally invalid
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// JWT claims structure
///
/// Standard claims only:
///
/// - `sub`: subject (user ID)
/// - `iss`: issuer (always "taskhub")
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs and validates access tokens with a single HS256 secret.
///
/// Construct one at startup from config and share it (the API keeps it in an
/// `Arc` inside application state). Cloning is cheap; the keys are small.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer from a signing secret and a default token lifetime.
    ///
    /// The secret's strength is the caller's responsibility; the API config
    /// refuses secrets shorter than 32 bytes before this is ever reached.
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        // Tokens die the second `exp` passes; issue and validation share a
        // clock here, so no skew allowance is needed.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    /// Issues a signed token for `subject` using the default lifetime.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issues a signed token for `subject` with an explicit lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::CreateError` if encoding fails.
    pub fn issue_with_ttl(&self, subject: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token and extracts its claims.
    ///
    /// Verifies the signature, the issuer, and that the token has not
    /// expired.
    ///
    /// # Errors
    ///
    /// - `TokenError::Expired` if `exp` has passed
    /// - `TokenError::InvalidSignature` if the signature doesn't check out
    /// - `TokenError::Malformed` for anything else (bad structure, bad
    ///   claims, wrong issuer)
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::Malformed(format!("Token validation failed: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Default lifetime applied by [`issue`](Self::issue).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::minutes(60))
    }

    /// Swaps one character in the middle of the signature segment, keeping
    /// the token base64-decodable.
    fn tamper_signature(token: &str) -> String {
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3, "JWT should have three segments");

        let mut chars: Vec<char> = parts[2].chars().collect();
        chars[5] = if chars[5] == 'A' { 'B' } else { 'A' };
        parts[2] = chars.into_iter().collect();
        parts.join(".")
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id).expect("Should create token");
        let claims = issuer.validate(&token).expect("Should validate token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskhub");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_issue_applies_default_ttl() {
        let issuer = TokenIssuer::new(SECRET, Duration::minutes(60));
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        let claims = issuer.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issuer().issue(Uuid::new_v4()).expect("Should create token");

        let other = TokenIssuer::new("another-secret-also-32-bytes-long!!!", Duration::minutes(60));
        let result = other.validate(&token);

        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_validate_tampered_signature() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).expect("Should create token");

        let result = issuer.validate(&tamper_signature(&token));
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_validate_expired_token() {
        let issuer = issuer();

        // Expired an hour ago
        let token = issuer
            .issue_with_ttl(Uuid::new_v4(), Duration::seconds(-3600))
            .expect("Should create token");

        let result = issuer.validate(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = issuer().validate("not-a-token");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_validate_missing_segment() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        // Chop off the signature entirely
        let truncated = token.rsplit_once('.').map(|(head, _)| head).unwrap();
        let result = issuer.validate(truncated);

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_token() {
        let result = issuer().validate("");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }
}
