//! # qadesk common library
//!
//! Shared code for the qadesk review service and its operator tooling:
//! - Record models for the work queues and the archive
//! - Database initialization and schema
//! - Configuration resolution
//! - Session token signing
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod session;
pub mod time;

pub use error::{Error, Result};
