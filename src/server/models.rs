//! Request and response bodies

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::fonts::DEFAULT_FONT;

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

/// Body of `POST /glitch` and `POST /glitch/preview`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchRequest {
    pub text: String,
    pub style: String,
    #[serde(default = "default_font")]
    pub font: String,
}

impl GlitchRequest {
    /// Reject text longer than `max_chars` characters.
    pub fn validate(&self, max_chars: usize) -> Result<(), ApiError> {
        check_length("text", &self.text, max_chars)
    }
}

/// Body of `POST /glitch/image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchImageRequest {
    #[serde(rename = "glitchedText")]
    pub glitched_text: String,
    #[serde(default = "default_font")]
    pub font: String,
}

impl GlitchImageRequest {
    pub fn validate(&self, max_chars: usize) -> Result<(), ApiError> {
        check_length("glitchedText", &self.glitched_text, max_chars)
    }
}

fn check_length(field: &str, value: &str, max_chars: usize) -> Result<(), ApiError> {
    let count = value.chars().count();
    if count > max_chars {
        return Err(ApiError::Validation(format!(
            "{} should have at most {} characters, got {}",
            field, max_chars, count
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchResponse {
    pub glitched_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    /// `data:image/png;base64,...`
    pub image_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
