//! # OAGG Common Library
//!
//! Shared code for the order aggregation service including:
//! - Domain models returned by the upstream services
//! - Bootstrap configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
