//! API route handlers organized by resource.
//!
//! - `health`: Service banner and health check
//! - `auth`: Authentication endpoints (register, login)
//! - `tasks`: Task CRUD endpoints

pub mod auth;
pub mod health;
pub mod tasks;
