//! Bearer-token authentication middleware for axum.
//!
//! Extracts the `Authorization: Bearer <token>` header, validates the token
//! against the shared [`TokenIssuer`], and inserts an [`AuthContext`] into
//! the request extensions for handlers to pick up with axum's `Extension`
//! extractor. Requests that fail any step never reach the handler.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{middleware, routing::get, Extension, Router};
//! use chrono::Duration;
//! use taskhub_shared::auth::middleware::{require_bearer, AuthContext};
//! use taskhub_shared::auth::token::TokenIssuer;
//!
//! async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
//!     auth.user_id.to_string()
//! }
//!
//! let tokens = Arc::new(TokenIssuer::new("a-secret-of-at-least-32-characters!!", Duration::minutes(60)));
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(middleware::from_fn(require_bearer(tokens)));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::token::{TokenError, TokenIssuer};

/// Authentication context added to request extensions after a token checks
/// out.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Authenticated user ID (the token's `sub` claim)
    pub user_id: Uuid,
}

/// Rejection produced by the bearer middleware
#[derive(Debug)]
pub enum AuthRejection {
    /// Authorization header missing or unreadable
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    InvalidFormat(String),

    /// Token failed validation
    InvalidToken(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AuthRejection::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing credentials".to_string(),
            ),
            AuthRejection::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AuthRejection::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
        };

        let body = Json(serde_json::json!({
            "error": error,
            "message": message,
        }));

        (status, body).into_response()
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthRejection::InvalidFormat("Expected Bearer token".to_string()))
}

/// Bearer authentication middleware.
///
/// On success the request gains an [`AuthContext`] extension and proceeds;
/// otherwise a JSON error response is returned without touching the handler.
pub async fn bearer_auth_middleware(
    tokens: Arc<TokenIssuer>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_bearer(req.headers())?;

    let claims = tokens.validate(token).map_err(|e| match e {
        TokenError::Expired => AuthRejection::InvalidToken("Token expired".to_string()),
        _ => AuthRejection::InvalidToken("Invalid token".to_string()),
    })?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}

/// Creates a bearer middleware closure capturing the token issuer.
///
/// Pass the result to `axum::middleware::from_fn`.
pub fn require_bearer(
    tokens: Arc<TokenIssuer>,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, AuthRejection>> + Send>>
       + Clone {
    move |req, next| {
        let tokens = tokens.clone();
        Box::pin(bearer_auth_middleware(tokens, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_ok() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthRejection::MissingCredentials)
        ));
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthRejection::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejection_status_codes() {
        let response = AuthRejection::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthRejection::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthRejection::InvalidToken("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
