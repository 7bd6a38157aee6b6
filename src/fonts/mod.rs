//! Font catalog and font faces
//!
//! The catalog maps a fixed set of font identifiers to TrueType files under a
//! fonts directory. Loading walks an ordered fallback chain:
//!
//! 1. The requested font, if the identifier is known
//! 2. The default font ([`DEFAULT_FONT`])
//! 3. The built-in bitmap face (see [`builtin`])
//!
//! Loading never fails; each failed candidate is logged and skipped.

pub mod builtin;

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use log::warn;
use rusttype::{point, Font, PositionedGlyph, Scale};
use thiserror::Error;

/// Identifier used when a request names no font or an unknown one.
pub const DEFAULT_FONT: &str = "cour";

/// Default directory holding the font files.
pub const DEFAULT_FONTS_DIR: &str = "fonts";

/// Known font identifiers and their file names.
pub const FONT_FILES: [(&str, &str); 5] = [
    ("cour", "cour.ttf"),
    ("vt323", "vt323.ttf"),
    ("orbitron", "orbitron.ttf"),
    ("creepster", "creepster.ttf"),
    ("press-start", "press-start-2p.ttf"),
];

/// Error loading a single font file
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FontLoadError {
    /// The file could not be read
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not a usable TrueType/OpenType font
    #[error("invalid font data in {0}")]
    InvalidData(PathBuf),
}

/// Pixel extent of a line of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
}

/// A step in the font fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontCandidate {
    File { id: &'static str, path: PathBuf },
    Builtin,
}

/// A loaded font face
pub enum FontFace {
    /// A scalable TrueType face loaded from the catalog
    TrueType { id: &'static str, font: Font<'static> },
    /// The fixed-size built-in bitmap face
    Builtin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::TrueType { id, .. } => f.debug_struct("TrueType").field("id", id).finish(),
            FontFace::Builtin => f.write_str("Builtin"),
        }
    }
}

impl FontFace {
    /// Parse a face from raw font bytes.
    pub fn from_bytes(id: &'static str, data: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(data).map(|font| FontFace::TrueType { id, font })
    }

    /// Catalog identifier of this face, or `"builtin"`.
    pub fn id(&self) -> &'static str {
        match self {
            FontFace::TrueType { id, .. } => id,
            FontFace::Builtin => "builtin",
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    /// Measure `text` at `size` pixels per em.
    ///
    /// Width is the advance extent of the glyph run, height is the line
    /// height. The built-in face ignores `size`.
    pub fn measure(&self, text: &str, size: u32) -> TextMetrics {
        match self {
            FontFace::TrueType { font, .. } => {
                let scale = em_scale(font, size);
                let v = font.v_metrics(scale);
                let width = font
                    .layout(text, scale, point(0.0, v.ascent))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0);
                TextMetrics {
                    width: width.max(0.0).ceil() as u32,
                    height: (v.ascent - v.descent).ceil() as u32,
                }
            }
            FontFace::Builtin => builtin::measure(text),
        }
    }

    /// Draw `text` at `size` with the top of the line at (`x`, `y`).
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, size: u32, x: i32, y: i32, color: Rgba<u8>) {
        match self {
            FontFace::TrueType { font, .. } => {
                let scale = em_scale(font, size);
                let v = font.v_metrics(scale);
                let origin = point(x as f32, y as f32 + v.ascent);
                for glyph in font.layout(text, scale, origin) {
                    draw_glyph(canvas, &glyph, color);
                }
            }
            FontFace::Builtin => builtin::draw(canvas, text, x, y, color),
        }
    }
}

/// Scale that makes one em equal `size` pixels.
///
/// rusttype scales by line height (ascent - descent), so convert from em.
fn em_scale(font: &Font<'_>, size: u32) -> Scale {
    let units = font.v_metrics_unscaled();
    let line = units.ascent - units.descent;
    let em = font.units_per_em() as f32;
    if line <= 0.0 || em <= 0.0 {
        return Scale::uniform(size as f32);
    }
    Scale::uniform(size as f32 * line / em)
}

fn draw_glyph(canvas: &mut RgbaImage, glyph: &PositionedGlyph<'_>, color: Rgba<u8>) {
    if let Some(bb) = glyph.pixel_bounding_box() {
        glyph.draw(|gx, gy, coverage| {
            plot(canvas, bb.min.x + gx as i32, bb.min.y + gy as i32, coverage, color);
        });
    }
}

/// Paint one pixel with `color` at the given coverage, clipping to the canvas.
///
/// Overlapping strokes keep the strongest coverage.
pub(crate) fn plot(canvas: &mut RgbaImage, x: i32, y: i32, coverage: f32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
    if alpha == 0 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    if alpha >= pixel[3] {
        *pixel = Rgba([color[0], color[1], color[2], alpha]);
    }
}

/// Static font catalog rooted at a fonts directory
#[derive(Debug, Clone)]
pub struct FontCatalog {
    dir: PathBuf,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FONTS_DIR)
    }
}

impl FontCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `id` names a catalog font.
    pub fn is_known(id: &str) -> bool {
        FONT_FILES.iter().any(|(key, _)| *key == id)
    }

    /// Canonical identifier for `id`, falling back to [`DEFAULT_FONT`].
    pub fn resolve_id(id: &str) -> &'static str {
        FONT_FILES
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(key, _)| *key)
            .unwrap_or(DEFAULT_FONT)
    }

    /// File path for a known identifier.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        FONT_FILES
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, file)| self.dir.join(file))
    }

    /// Ordered candidates tried when loading `id`.
    pub fn fallback_chain(&self, id: &str) -> Vec<FontCandidate> {
        let mut chain = Vec::with_capacity(3);
        let primary = Self::resolve_id(id);
        for candidate in [primary, DEFAULT_FONT] {
            let already = chain
                .iter()
                .any(|c| matches!(c, FontCandidate::File { id, .. } if *id == candidate));
            if already {
                continue;
            }
            if let Some(path) = self.path_for(candidate) {
                chain.push(FontCandidate::File { id: candidate, path });
            }
        }
        chain.push(FontCandidate::Builtin);
        chain
    }

    /// Load the best available face for `id`. Never fails.
    pub fn load(&self, id: &str) -> FontFace {
        for candidate in self.fallback_chain(id) {
            match candidate {
                FontCandidate::File { id: font_id, path } => match load_truetype(font_id, &path) {
                    Ok(face) => return face,
                    Err(e) => warn!("font fallback: {}", e),
                },
                FontCandidate::Builtin => break,
            }
        }
        warn!("font fallback to built-in face for '{}'", id);
        FontFace::Builtin
    }
}

/// Read and parse a single font file.
pub fn load_truetype(id: &'static str, path: &Path) -> Result<FontFace, FontLoadError> {
    let data = fs::read(path).map_err(|source| FontLoadError::Io { path: path.to_path_buf(), source })?;
    FontFace::from_bytes(id, data).ok_or_else(|| FontLoadError::InvalidData(path.to_path_buf()))
}
