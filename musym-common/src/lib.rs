//! # musym common library
//!
//! Shared code for the musym tools:
//! - Error type and result alias
//! - Configuration file resolution and TOML loading
//! - Logging configuration and tracing initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
