//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod render;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::glitch::{glitch_preview, glitch_text, Style};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Glitchtext - decorative text distortion service
#[derive(Parser)]
#[command(name = "glitchd")]
#[command(about = "Glitchtext - glitch text effects over HTTP, with PNG rendering")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on (overrides config and GLITCH_BIND)
        #[arg(short, long)]
        bind: Option<String>,

        /// Path to glitch.toml (default: search upward from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the catalog fonts (overrides config and GLITCH_FONTS_DIR)
        #[arg(long)]
        fonts_dir: Option<PathBuf>,
    },
    /// Glitch text and print the result
    Glitch {
        /// Text to transform
        text: String,

        /// Style: zalgo, ascii, vaporwave, chaos, blockchain (others pass through)
        #[arg(short, long)]
        style: String,

        /// Truncate like the preview endpoint
        #[arg(long)]
        preview: bool,
    },
    /// Render text to a PNG file
    Render {
        /// Text to render (already glitched, or plain)
        text: String,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Font identifier: cour, vt323, orbitron, creepster, press-start
        #[arg(short, long, default_value = crate::fonts::DEFAULT_FONT)]
        font: String,

        /// Directory holding the catalog fonts
        #[arg(long, default_value = crate::fonts::DEFAULT_FONTS_DIR)]
        fonts_dir: PathBuf,

        /// Apply a glitch style before rendering
        #[arg(short, long)]
        style: Option<String>,
    },
    /// List the known glitch styles
    Styles,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Serve { bind, config, fonts_dir } => serve::run_serve(bind, config, fonts_dir),
        Commands::Glitch { text, style, preview } => run_glitch(&text, &style, preview),
        Commands::Render { text, output, font, fonts_dir, style } => {
            render::run_render(&text, &output, &font, &fonts_dir, style.as_deref())
        }
        Commands::Styles => run_styles(),
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn run_glitch(text: &str, style: &str, preview: bool) -> ExitCode {
    let mut rng = rand::rng();
    let out = if preview {
        glitch_preview(text, style, &mut rng)
    } else {
        glitch_text(text, style, &mut rng)
    };
    println!("{}", out);
    ExitCode::from(EXIT_SUCCESS)
}

fn run_styles() -> ExitCode {
    for style in Style::ALL {
        let note = if style.is_random() { " (random)" } else { "" };
        println!("{}{}", style, note);
    }
    ExitCode::from(EXIT_SUCCESS)
}
