//! # MVB Common Library
//!
//! Shared code for the movie browser crates including:
//! - Database schema, models and queries
//! - Configuration loading and root folder resolution
//! - Common error type
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
