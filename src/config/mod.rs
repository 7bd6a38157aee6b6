//! Configuration module for the glitch service
//!
//! Provides types and parsing for `glitch.toml` plus environment and CLI
//! overrides.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
