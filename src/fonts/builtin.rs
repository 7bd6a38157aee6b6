//! Built-in bitmap face
//!
//! Last resort when no font file can be loaded. Glyphs come from the 8x8
//! `font8x8` tables and are drawn at a fixed scale, so the face ignores the
//! requested size entirely.

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};

use super::{plot, TextMetrics};

/// Side of a glyph cell in font units.
pub const GLYPH_CELL: u32 = 8;

/// Pixel scale applied to every glyph cell.
pub const GLYPH_SCALE: u32 = 2;

/// Rendered side of one cell in pixels.
pub const CELL_PX: u32 = GLYPH_CELL * GLYPH_SCALE;

/// How a character occupies the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    /// Combining mark; no advance and nothing drawn
    Mark,
    /// Bitmap spanning `cells` cells
    Bitmap { bits: [u8; 8], cells: u32 },
    /// Character with no bitmap; occupies an empty cell
    Blank,
}

fn classify(c: char) -> Glyph {
    match c {
        '\u{0300}'..='\u{036F}' => Glyph::Mark,
        // Fullwidth ASCII variants render as the narrow glyph in a double cell
        '\u{FF01}'..='\u{FF5E}' => {
            let narrow = char::from_u32(c as u32 - 0xFEE0).unwrap_or('?');
            match lookup(narrow) {
                Some(bits) => Glyph::Bitmap { bits, cells: 2 },
                None => Glyph::Blank,
            }
        }
        _ => match lookup(c) {
            Some(bits) => Glyph::Bitmap { bits, cells: 1 },
            None => Glyph::Blank,
        },
    }
}

fn lookup(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
}

fn advance(glyph: Glyph) -> u32 {
    match glyph {
        Glyph::Mark => 0,
        Glyph::Bitmap { cells, .. } => cells * CELL_PX,
        Glyph::Blank => CELL_PX,
    }
}

/// Measure `text`. Every line is exactly one cell tall.
pub fn measure(text: &str) -> TextMetrics {
    let width = text.chars().map(|c| advance(classify(c))).sum();
    TextMetrics { width, height: CELL_PX }
}

/// Draw `text` with its top-left corner at (`x`, `y`).
pub fn draw(canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
    let mut cursor = x;
    for c in text.chars() {
        let glyph = classify(c);
        if let Glyph::Bitmap { bits, cells } = glyph {
            // Center the glyph horizontally inside its cells
            let left = cursor + ((cells - 1) * CELL_PX / 2) as i32;
            draw_bitmap(canvas, &bits, left, y, color);
        }
        cursor += advance(glyph) as i32;
    }
}

fn draw_bitmap(canvas: &mut RgbaImage, bits: &[u8; 8], x: i32, y: i32, color: Rgba<u8>) {
    let scale = GLYPH_SCALE as i32;
    for (row, byte) in bits.iter().enumerate() {
        for col in 0..GLYPH_CELL as i32 {
            if (byte >> col) & 1 == 0 {
                continue;
            }
            let px = x + col * scale;
            let py = y + row as i32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    plot(canvas, px + dx, py + dy, 1.0, color);
                }
            }
        }
    }
}
