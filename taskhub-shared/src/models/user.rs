//! User model and database operations.
//!
//! Users are the credential store rows behind registration and login. The
//! only mutations the system performs are inserts; identity records are never
//! updated or deleted through the API.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     email TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     full_name TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Emails are stored lowercase; `AuthService` normalizes before every insert
//! and lookup, so the plain UNIQUE constraint gives case-insensitive
//! uniqueness.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A registered user account.
///
/// `password_hash` is the Argon2id PHC string and never serializes into API
/// responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, stored lowercase, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user row.
///
/// `password_hash` must already be hashed; this layer never sees plaintext.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address, already normalized to lowercase
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,
}

impl User {
    /// Inserts a new user and returns the stored row.
    ///
    /// Uniqueness is enforced by the database constraint on `email`; a
    /// duplicate insert surfaces as a unique-violation `sqlx::Error` for the
    /// caller to classify. There is deliberately no existence pre-check, so
    /// two concurrent registrations cannot both pass.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.full_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address.
    ///
    /// The caller is expected to pass a normalized (lowercased) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_excludes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: Some("Test User".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).expect("Should serialize");

        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["full_name"], "Test User");
        assert!(
            json.get("password_hash").is_none(),
            "password_hash must never appear in serialized output"
        );
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: None,
        };

        assert_eq!(create_user.email, "test@example.com");
        assert!(create_user.full_name.is_none());
    }

    // Database round-trips are covered in tests/auth_service_tests.rs
}
