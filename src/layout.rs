//! Text layout and image rendering
//!
//! Picks the largest font size whose rendered width fits the canvas, then
//! draws the text centered on a transparent RGBA canvas.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::fonts::{FontCatalog, FontFace, TextMetrics};
use crate::output::{image_data_uri, OutputError};

/// Smallest font size the search returns.
pub const START_SIZE: u32 = 10;
/// Increment between candidate sizes.
pub const SIZE_STEP: u32 = 1;
/// Largest candidate size the search measures.
pub const MAX_SIZE: u32 = 200;

/// Fixed canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1200;
/// Margin above and below the text, and on either side of the width budget.
pub const MARGIN: u32 = 20;
/// Opaque green.
pub const FOREGROUND: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Canvas geometry and colors for a render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub canvas_width: u32,
    pub margin: u32,
    pub color: Rgba<u8>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { canvas_width: CANVAS_WIDTH, margin: MARGIN, color: FOREGROUND }
    }
}

impl LayoutOptions {
    /// Width budget for the text: canvas width minus both margins.
    pub fn max_text_width(&self) -> u32 {
        self.canvas_width.saturating_sub(2 * self.margin)
    }
}

/// Result of laying out and drawing a line of text
#[derive(Debug, Clone)]
pub struct TextLayout {
    /// Face actually used after fallback
    pub font_id: &'static str,
    pub font_size: u32,
    /// Measured text extent at `font_size`
    pub text: TextMetrics,
    pub image: RgbaImage,
}

impl TextLayout {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Find the largest size whose measured width does not exceed `max_width`.
///
/// Sizes are scanned upward from [`START_SIZE`] to [`MAX_SIZE`]; the scan
/// stops at the first size that overflows and the previous size wins. If even
/// the start size overflows, the start size is returned. Text that never
/// overflows ends at [`MAX_SIZE`].
pub fn optimal_font_size<F>(mut measure_width: F, max_width: u32) -> u32
where
    F: FnMut(u32) -> u32,
{
    let mut size = START_SIZE;
    while size <= MAX_SIZE {
        if measure_width(size) > max_width {
            break;
        }
        size += SIZE_STEP;
    }
    if size > START_SIZE {
        size - SIZE_STEP
    } else {
        START_SIZE
    }
}

/// Lay out `text` with an already loaded face.
pub fn layout_with_face(text: &str, face: &FontFace, options: &LayoutOptions) -> TextLayout {
    let max_width = options.max_text_width();
    let font_size = optimal_font_size(|size| face.measure(text, size).width, max_width);
    let metrics = face.measure(text, font_size);

    let height = metrics.height + 2 * options.margin;
    let mut image = RgbaImage::from_pixel(options.canvas_width, height, Rgba([0, 0, 0, 0]));

    let x = (options.canvas_width as i32 - metrics.width as i32) / 2;
    let y = options.margin as i32;
    face.draw(&mut image, text, font_size, x, y, options.color);

    debug!(
        "laid out {} chars with {} at {}px ({}x{})",
        text.chars().count(),
        face.id(),
        font_size,
        metrics.width,
        metrics.height
    );

    TextLayout { font_id: face.id(), font_size, text: metrics, image }
}

/// Resolve `font_id` through the catalog and lay out `text`.
pub fn layout(catalog: &FontCatalog, text: &str, font_id: &str, options: &LayoutOptions) -> TextLayout {
    let face = catalog.load(font_id);
    layout_with_face(text, &face, options)
}

/// Render `text` to a `data:image/png;base64,...` URI.
pub fn render_data_uri(
    catalog: &FontCatalog,
    text: &str,
    font_id: &str,
    options: &LayoutOptions,
) -> Result<String, OutputError> {
    let laid_out = layout(catalog, text, font_id, options);
    image_data_uri(&laid_out.image)
}
