//! # Fonts
//!
//! The engine draws with four of the 14 standard PDF fonts, which every
//! PDF reader carries, so nothing is ever embedded. Measurement uses the
//! Adobe AFM advance widths in [`metrics`].

pub mod metrics;

pub use metrics::StandardFontMetrics;

use serde::{Deserialize, Serialize};

/// The standard PDF faces the block renderers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Courier,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::Courier => "Courier",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => StandardFontMetrics::helvetica(),
            Self::HelveticaBold => StandardFontMetrics::helvetica_bold(),
            Self::Courier => StandardFontMetrics::courier(),
        }
    }

    /// Advance width of one character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.metrics().char_width(ch, font_size)
    }

    /// Width of a string on a single line, in points.
    pub fn measure(&self, text: &str, font_size: f64) -> f64 {
        self.metrics().measure_string(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_space() {
        let w = StandardFont::Helvetica.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_wider() {
        let regular = StandardFont::Helvetica.measure("ABCDEFG abcdefg", 12.0);
        let bold = StandardFont::HelveticaBold.measure("ABCDEFG abcdefg", 12.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_oblique_matches_regular() {
        let a = StandardFont::Helvetica.measure("slanted", 11.0);
        let b = StandardFont::HelveticaOblique.measure("slanted", 11.0);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_courier_fixed_pitch() {
        let narrow = StandardFont::Courier.measure("iiii", 10.0);
        let wide = StandardFont::Courier.measure("MMMM", 10.0);
        assert!((narrow - wide).abs() < 1e-9);
        assert!((narrow - 24.0).abs() < 1e-9);
    }
}
