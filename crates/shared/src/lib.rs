//! # Moonlit Shared
//!
//! Common types and interfaces used across all Moonlit packages.

pub mod config;
pub mod date;
pub mod error;

// Re-exports
pub use config::*;
pub use date::*;
pub use error::*;
