//! Glitchtext - glitch text effects service

use std::process::ExitCode;

use glitchtext::cli;

fn main() -> ExitCode {
    cli::run()
}
