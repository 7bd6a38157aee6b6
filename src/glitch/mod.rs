//! Glitch text effects
//!
//! # Module Structure
//!
//! - [`styles`] - The individual text transforms (zalgo, ascii art, ...)
//!
//! This module owns style dispatch: a style identifier coming off the wire is
//! resolved to a [`Style`] through a fixed lookup table. Identifiers that are
//! not in the table resolve to [`Style::Unknown`], which leaves text untouched.

pub mod styles;

use std::fmt;

use rand::Rng;

pub use styles::{ascii_art, blockchain, chaos, vaporwave, zalgo};

/// Number of characters a preview keeps before truncating.
pub const PREVIEW_CHARS: usize = 10;

/// Marker appended to truncated previews.
pub const PREVIEW_SUFFIX: &str = "...";

/// A named glitch style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Zalgo,
    Ascii,
    Vaporwave,
    Chaos,
    Blockchain,
    /// Any identifier not in the style table; text passes through unchanged
    Unknown,
}

/// Wire identifiers for every known style. Matching is exact and case-sensitive.
const STYLE_TABLE: [(&str, Style); 5] = [
    ("zalgo", Style::Zalgo),
    ("ascii", Style::Ascii),
    ("vaporwave", Style::Vaporwave),
    ("chaos", Style::Chaos),
    ("blockchain", Style::Blockchain),
];

impl Style {
    /// All known styles, in table order.
    pub const ALL: [Style; 5] =
        [Style::Zalgo, Style::Ascii, Style::Vaporwave, Style::Chaos, Style::Blockchain];

    /// Resolve a style identifier. Never fails.
    pub fn parse(name: &str) -> Style {
        STYLE_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, style)| *style)
            .unwrap_or(Style::Unknown)
    }

    /// The identifier clients use for this style.
    pub fn name(self) -> &'static str {
        STYLE_TABLE
            .iter()
            .find(|(_, style)| *style == self)
            .map(|(key, _)| *key)
            .unwrap_or("unknown")
    }

    /// Whether output depends on the random source.
    pub fn is_random(self) -> bool {
        matches!(self, Style::Zalgo | Style::Chaos)
    }

    /// Apply this style to `text`.
    pub fn apply<R: Rng + ?Sized>(self, text: &str, rng: &mut R) -> String {
        match self {
            Style::Zalgo => zalgo(text, rng),
            Style::Ascii => ascii_art(text),
            Style::Vaporwave => vaporwave(text),
            Style::Chaos => chaos(text, rng),
            Style::Blockchain => blockchain(text),
            Style::Unknown => text.to_string(),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Glitch `text` with the style named `style`.
///
/// Unknown style names return the text unchanged.
pub fn glitch_text<R: Rng + ?Sized>(text: &str, style: &str, rng: &mut R) -> String {
    Style::parse(style).apply(text, rng)
}

/// Preview a glitch: text longer than [`PREVIEW_CHARS`] characters is cut down
/// to that many, glitched, and suffixed with [`PREVIEW_SUFFIX`].
pub fn glitch_preview<R: Rng + ?Sized>(text: &str, style: &str, rng: &mut R) -> String {
    glitch_preview_with_limit(text, style, PREVIEW_CHARS, rng)
}

/// [`glitch_preview`] with a custom character limit.
pub fn glitch_preview_with_limit<R: Rng + ?Sized>(
    text: &str,
    style: &str,
    limit: usize,
    rng: &mut R,
) -> String {
    match text.char_indices().nth(limit) {
        // There is a character past the limit, so the text is too long
        Some((cut, _)) => {
            let mut out = glitch_text(&text[..cut], style, rng);
            out.push_str(PREVIEW_SUFFIX);
            out
        }
        None => glitch_text(text, style, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn test_parse_known_styles() {
        assert_eq!(Style::parse("zalgo"), Style::Zalgo);
        assert_eq!(Style::parse("ascii"), Style::Ascii);
        assert_eq!(Style::parse("vaporwave"), Style::Vaporwave);
        assert_eq!(Style::parse("chaos"), Style::Chaos);
        assert_eq!(Style::parse("blockchain"), Style::Blockchain);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Style::parse("Zalgo"), Style::Unknown);
        assert_eq!(Style::parse("ASCII"), Style::Unknown);
        assert_eq!(Style::parse(" chaos"), Style::Unknown);
        assert_eq!(Style::parse(""), Style::Unknown);
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for style in Style::ALL {
            assert_eq!(Style::parse(style.name()), style);
        }
        assert_eq!(Style::Unknown.name(), "unknown");
        assert_eq!(Style::Vaporwave.to_string(), "vaporwave");
    }

    #[test]
    fn test_unknown_style_passes_through() {
        assert_eq!(glitch_text("hello", "unknown_style", &mut rng()), "hello");
        assert_eq!(glitch_text("", "nope", &mut rng()), "");
    }

    #[test]
    fn test_dispatch_matches_direct_call() {
        assert_eq!(glitch_text("hi", "vaporwave", &mut rng()), "ｈｉ");
        assert_eq!(glitch_text("hi", "blockchain", &mut rng()), "0x6869");
        assert_eq!(glitch_text("cab", "ascii", &mut rng()), "▒█▓");
        assert_eq!(glitch_text("hey", "zalgo", &mut rng()), zalgo("hey", &mut rng()));
        assert_eq!(glitch_text("hey", "chaos", &mut rng()), chaos("hey", &mut rng()));
    }

    #[test]
    fn test_preview_short_text_has_no_suffix() {
        assert_eq!(glitch_preview("hi", "vaporwave", &mut rng()), "ｈｉ");
        assert_eq!(glitch_preview("0123456789", "blockchain", &mut rng()), blockchain("0123456789"));
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "abcdefghijklmno";
        let out = glitch_preview(text, "blockchain", &mut rng());
        assert_eq!(out, format!("{}...", blockchain("abcdefghij")));
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "ééééééééééé"; // 11 chars, 22 bytes
        let out = glitch_preview(text, "unknown", &mut rng());
        assert_eq!(out, "éééééééééé...");
    }

    #[test]
    fn test_preview_with_custom_limit() {
        assert_eq!(glitch_preview_with_limit("abcdef", "ascii", 3, &mut rng()), "█▓▒...");
        assert_eq!(glitch_preview_with_limit("abc", "ascii", 3, &mut rng()), "█▓▒");
    }

    #[test]
    fn test_is_random() {
        assert!(Style::Zalgo.is_random());
        assert!(Style::Chaos.is_random());
        assert!(!Style::Blockchain.is_random());
        assert!(!Style::Unknown.is_random());
    }
}
