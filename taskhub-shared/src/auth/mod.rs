//! Authentication for taskhub.
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`token`]: access token (JWT) issuing and validation
//! - [`service`]: registration and login orchestration
//! - [`middleware`]: axum bearer-token middleware
//!
//! The design rule across these modules: configuration is injected, never
//! read from ambient environment, and credential failures collapse into a
//! single indistinguishable error at the service boundary.

pub mod middleware;
pub mod password;
pub mod service;
pub mod token;
