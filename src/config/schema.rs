//! Configuration schema types for `glitch.toml`
//!
//! Defines the structure and validation rules for the service configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

/// HTTP listener and CORS settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), allowed_origins: default_allowed_origins() }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Request size and rate limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum characters accepted in a glitch request
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    /// Characters kept by the preview endpoint
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Maximum characters accepted by the image endpoint
    #[serde(default = "default_max_render_chars")]
    pub max_render_chars: usize,
    /// Requests allowed per client per window on `/glitch`
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,
    /// Rate limit window length in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            preview_chars: default_preview_chars(),
            max_render_chars: default_max_render_chars(),
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }
    }
}

fn default_max_text_chars() -> usize {
    50
}

fn default_preview_chars() -> usize {
    crate::glitch::PREVIEW_CHARS
}

fn default_max_render_chars() -> usize {
    1000
}

fn default_rate_limit_requests() -> u32 {
    10
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

/// Image rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory holding the catalog font files
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fonts_dir: default_fonts_dir() }
    }
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from(crate::fonts::DEFAULT_FONTS_DIR)
}

/// Root configuration structure for `glitch.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlitchConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl GlitchConfig {
    /// Validate the configuration and return all errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(ConfigValidationError {
                field: "server.bind".to_string(),
                message: format!("'{}' is not a socket address (host:port)", self.server.bind),
            });
        }

        for origin in &self.server.allowed_origins {
            if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
                errors.push(ConfigValidationError {
                    field: "server.allowed_origins".to_string(),
                    message: format!("'{}' is not a valid origin", origin),
                });
            }
        }

        if self.limits.max_text_chars == 0 {
            errors.push(ConfigValidationError {
                field: "limits.max_text_chars".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.limits.max_render_chars == 0 {
            errors.push(ConfigValidationError {
                field: "limits.max_render_chars".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.limits.rate_limit_requests == 0 {
            errors.push(ConfigValidationError {
                field: "limits.rate_limit_requests".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.limits.rate_limit_window_secs == 0 {
            errors.push(ConfigValidationError {
                field: "limits.rate_limit_window_secs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Human-readable rate limit, e.g. "10 per 1 minute"
    pub fn rate_limit_description(&self) -> String {
        describe_rate(self.limits.rate_limit_requests, self.limits.rate_limit_window_secs)
    }
}

pub(crate) fn describe_rate(requests: u32, window_secs: u64) -> String {
    if window_secs % 60 == 0 {
        let minutes = window_secs / 60;
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!("{} per {} {}", requests, minutes, unit)
    } else {
        let unit = if window_secs == 1 { "second" } else { "seconds" };
        format!("{} per {} {}", requests, window_secs, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GlitchConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.limits.max_text_chars, 50);
        assert_eq!(config.limits.preview_chars, 10);
        assert_eq!(config.limits.rate_limit_requests, 10);
        assert_eq!(config.limits.rate_limit_window_secs, 60);
        assert_eq!(config.render.fonts_dir, PathBuf::from("fonts"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: GlitchConfig = toml::from_str(
            r#"
[server]
bind = "127.0.0.1:9000"

[limits]
rate_limit_requests = 3
"#,
        )
        .expect("should parse");

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.allowed_origins, default_allowed_origins());
        assert_eq!(config.limits.rate_limit_requests, 3);
        assert_eq!(config.limits.max_text_chars, 50);
    }

    #[test]
    fn test_parse_empty_toml() {
        let config: GlitchConfig = toml::from_str("").expect("should parse");
        assert_eq!(config, GlitchConfig::default());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = GlitchConfig::default();
        config.server.bind = "not an address".to_string();
        config.server.allowed_origins = vec!["".to_string(), "http://ok.example".to_string()];
        config.limits.max_text_chars = 0;
        config.limits.rate_limit_window_secs = 0;

        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind",
                "server.allowed_origins",
                "limits.max_text_chars",
                "limits.rate_limit_window_secs"
            ]
        );
    }

    #[test]
    fn test_validate_rejects_origin_with_newline() {
        let mut config = GlitchConfig::default();
        config.server.allowed_origins = vec!["http://a\nb".to_string()];
        assert!(!config.is_valid());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "limits.max_text_chars".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "limits.max_text_chars: must be a positive integer");
    }

    #[test]
    fn test_rate_limit_description() {
        assert_eq!(GlitchConfig::default().rate_limit_description(), "10 per 1 minute");
        assert_eq!(describe_rate(5, 120), "5 per 2 minutes");
        assert_eq!(describe_rate(1, 1), "1 per 1 second");
        assert_eq!(describe_rate(2, 30), "2 per 30 seconds");
    }
}
