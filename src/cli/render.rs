//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::fonts::FontCatalog;
use crate::glitch::glitch_text;
use crate::layout::{layout, LayoutOptions};
use crate::output::save_png;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(
    text: &str,
    output: &Path,
    font: &str,
    fonts_dir: &Path,
    style: Option<&str>,
) -> ExitCode {
    let text = match style {
        Some(style) => glitch_text(text, style, &mut rand::rng()),
        None => text.to_string(),
    };

    let catalog = FontCatalog::new(fonts_dir);
    let laid_out = layout(&catalog, &text, font, &LayoutOptions::default());

    if let Err(e) = save_png(&laid_out.image, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Saved: {} ({}x{}, {} at {}px)",
        output.display(),
        laid_out.width(),
        laid_out.height(),
        laid_out.font_id,
        laid_out.font_size
    );
    ExitCode::from(EXIT_SUCCESS)
}
