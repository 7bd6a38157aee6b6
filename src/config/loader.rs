//! Configuration loading and discovery for `glitch.toml`
//!
//! Provides functions to find, load, and merge configuration. Precedence,
//! lowest first: built-in defaults, the config file, environment variables,
//! command-line flags.

use super::schema::GlitchConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for.
pub const CONFIG_FILE: &str = "glitch.toml";

/// Comma-separated list of CORS origins.
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
/// Listen address override.
pub const ENV_BIND: &str = "GLITCH_BIND";
/// Fonts directory override.
pub const ENV_FONTS_DIR: &str = "GLITCH_FONTS_DIR";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse glitch.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Values read from the process environment
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub allowed_origins: Option<Vec<String>>,
    pub bind: Option<String>,
    pub fonts_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the real process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            allowed_origins: lookup(ENV_ALLOWED_ORIGINS).map(|v| parse_origins(&v)),
            bind: lookup(ENV_BIND).filter(|v| !v.trim().is_empty()),
            fonts_dir: lookup(ENV_FONTS_DIR).filter(|v| !v.trim().is_empty()).map(PathBuf::from),
        }
    }
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Explicit config file path
    pub config: Option<PathBuf>,
    /// Override listen address
    pub bind: Option<String>,
    /// Override fonts directory
    pub fonts_dir: Option<PathBuf>,
}

/// Split a comma-separated origin list, trimming whitespace and dropping
/// empty entries.
pub fn parse_origins(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Find glitch.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find glitch.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from a glitch.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("deploy/glitch.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<GlitchConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(GlitchConfig::default()),
    }
}

/// Load configuration from a specific file path.
///
/// A relative `render.fonts_dir` is resolved against the file's directory.
fn load_config_file(path: &Path) -> Result<GlitchConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: GlitchConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = config_root(path) {
        config.render.fonts_dir = resolve_path(root, &config.render.fonts_dir);
    }

    Ok(config)
}

/// Apply environment overrides to a configuration.
pub fn merge_env_overrides(config: &mut GlitchConfig, overrides: &EnvOverrides) {
    if let Some(ref origins) = overrides.allowed_origins {
        config.server.allowed_origins = origins.clone();
    }

    if let Some(ref bind) = overrides.bind {
        config.server.bind = bind.clone();
    }

    if let Some(ref fonts_dir) = overrides.fonts_dir {
        config.render.fonts_dir = fonts_dir.clone();
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file and environment values.
pub fn merge_cli_overrides(config: &mut GlitchConfig, overrides: &CliOverrides) {
    if let Some(ref bind) = overrides.bind {
        config.server.bind = bind.clone();
    }

    if let Some(ref fonts_dir) = overrides.fonts_dir {
        config.render.fonts_dir = fonts_dir.clone();
    }
}

/// Load, merge, and validate the effective configuration.
pub fn resolve_config(
    env_overrides: &EnvOverrides,
    cli_overrides: &CliOverrides,
) -> Result<GlitchConfig, ConfigError> {
    let mut config = load_config(cli_overrides.config.as_deref())?;
    merge_env_overrides(&mut config, env_overrides);
    merge_cli_overrides(&mut config, cli_overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Directory containing a config file.
pub fn config_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Resolve a path relative to the config directory.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the root.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
