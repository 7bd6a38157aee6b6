//! Glitchtext - decorative text distortion with PNG rendering
//!
//! This library provides functionality to:
//! - Apply glitch styles (zalgo, ascii, vaporwave, chaos, blockchain) to text
//! - Lay out text at the largest size fitting a fixed-width canvas
//! - Render it to PNG and data URIs
//! - Serve all of the above over HTTP

pub mod cli;
pub mod config;
pub mod fonts;
pub mod glitch;
pub mod layout;
pub mod output;
pub mod server;
