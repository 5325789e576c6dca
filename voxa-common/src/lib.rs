//! # Voxa Common Library
//!
//! Shared code for the Voxa voice services:
//! - Error types
//! - Configuration loading and external tool path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
