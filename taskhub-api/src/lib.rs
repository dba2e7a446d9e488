//! # taskhub API Server Library
//!
//! Core functionality for the taskhub API server: HTTP routing, request
//! validation, and the mapping from domain errors to HTTP responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
