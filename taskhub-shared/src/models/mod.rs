//! Database models for taskhub.
//!
//! Each model owns its table's queries as inherent async functions taking a
//! `PgPool`. Uniqueness and referential integrity live in the schema, not in
//! application-level pre-checks, so concurrent writers race safely.
//!
//! # Models
//!
//! - `user`: registered accounts (the credential store)
//! - `task`: task records with the three-state workflow

pub mod task;
pub mod user;
