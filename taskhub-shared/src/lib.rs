//! # taskhub shared library
//!
//! Domain logic shared by the taskhub binaries: credential handling, access
//! tokens, the task workflow, and persistence.
//!
//! ## Module organization
//!
//! - `auth`: password hashing, token issuing, login/registration, middleware
//! - `models`: database models and their queries
//! - `tasks`: task service (CRUD + status workflow)
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod tasks;

/// Current version of the taskhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
