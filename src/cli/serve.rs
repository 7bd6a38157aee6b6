//! Serve command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use log::error;

use crate::config::{resolve_config, CliOverrides, ConfigError, EnvOverrides};
use crate::server;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the serve command
pub fn run_serve(bind: Option<String>, config: Option<PathBuf>, fonts_dir: Option<PathBuf>) -> ExitCode {
    let overrides = CliOverrides { config, bind, fonts_dir };
    let config = match resolve_config(&EnvOverrides::from_env(), &overrides) {
        Ok(config) => config,
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to start async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match runtime.block_on(server::serve(config)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
