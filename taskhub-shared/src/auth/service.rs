//! Registration and login orchestration.
//!
//! `AuthService` ties the password hasher, the credential store, and the
//! token issuer together. It owns the two policy decisions that matter at
//! this seam:
//!
//! - duplicate emails are detected by the database unique constraint, never
//!   by a lookup-then-insert sequence, so concurrent registrations of the
//!   same address produce exactly one account;
//! - an unknown email and a wrong password are indistinguishable to the
//!   caller, both yielding [`AuthError::InvalidCredentials`].

use std::sync::Arc;

use sqlx::PgPool;

use super::password::{hash_password, verify_password, PasswordError};
use super::token::{TokenError, TokenIssuer};
use crate::models::user::{CreateUser, User};

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email is already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password (deliberately merged)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token issuing failed
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Normalizes an email for storage and lookup: trimmed and lowercased.
///
/// Registration and login both pass through here, so the plain UNIQUE
/// constraint on `users.email` behaves case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Handles registration and login against the credential store.
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    /// Creates a new auth service over the given pool and token issuer.
    pub fn new(db: PgPool, tokens: Arc<TokenIssuer>) -> Self {
        Self { db, tokens }
    }

    /// Registers a new user.
    ///
    /// Hashes the password, inserts the row, and classifies a unique
    /// violation on the email column as [`AuthError::DuplicateEmail`].
    ///
    /// # Errors
    ///
    /// - `AuthError::DuplicateEmail` if the email is already registered
    /// - `AuthError::Password` if hashing fails
    /// - `AuthError::Database` for any other database failure
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let result = User::create(
            &self.db,
            CreateUser {
                email,
                password_hash,
                full_name,
            },
        )
        .await;

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation()
                    && db_err.constraint().is_some_and(|c| c.contains("email")) =>
            {
                tracing::debug!("Registration rejected: email already registered");
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(AuthError::Database(e)),
        }
    }

    /// Exchanges credentials for a signed access token.
    ///
    /// Both failure paths (unknown email, wrong password) return
    /// [`AuthError::InvalidCredentials`] so responses cannot be used to probe
    /// which addresses are registered. A stored hash that fails to parse is a
    /// `Password` error instead: data corruption is not a bad login.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let user = match User::find_by_email(&self.db, &email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("User@Example.COM"), "user@example.com");
        assert_eq!(normalize_email("  padded@example.com  "), "padded@example.com");
        assert_eq!(normalize_email("already@lower.case"), "already@lower.case");
    }

    #[test]
    fn test_merged_failure_message() {
        // Unknown email and wrong password must render identically
        let a = AuthError::InvalidCredentials.to_string();
        assert_eq!(a, "Invalid email or password");
    }

    #[test]
    fn test_duplicate_email_message() {
        assert_eq!(
            AuthError::DuplicateEmail.to_string(),
            "Email already registered"
        );
    }

    // register/login round-trips need a live database; see tests/auth_service_tests.rs
}
