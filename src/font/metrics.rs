//! Advance widths for the standard fonts, from the Adobe Core 14 AFM files.
//!
//! Widths are in 1/1000 em. The tables cover printable ASCII; a handful of
//! WinAnsi punctuation marks are looked up separately, and anything else
//! measures as the font's default width.

/// Helvetica, U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold, U+0020..=U+007E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Metrics for one standard font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    widths: Option<&'static [u16; 95]>,
    bold: bool,
    default_width: u16,
}

impl StandardFontMetrics {
    pub fn helvetica() -> Self {
        Self {
            widths: Some(&HELVETICA),
            bold: false,
            default_width: 556,
        }
    }

    pub fn helvetica_bold() -> Self {
        Self {
            widths: Some(&HELVETICA_BOLD),
            bold: true,
            default_width: 611,
        }
    }

    /// Courier: every glyph is 600 units wide.
    pub fn courier() -> Self {
        Self {
            widths: None,
            bold: false,
            default_width: 600,
        }
    }

    fn units(&self, ch: char) -> u16 {
        let Some(table) = self.widths else {
            return self.default_width;
        };
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return table[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => 278,
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' => {
                if self.bold {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if self.bold {
                    500
                } else {
                    333
                }
            }
            '\u{00A9}' | '\u{00AE}' => 737,
            '\u{00B7}' => 278,
            _ => self.default_width,
        }
    }

    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_matches_afm() {
        let m = StandardFontMetrics::helvetica();
        assert_eq!(m.units('A'), 667);
        assert_eq!(m.units('i'), 222);
        assert_eq!(m.units('~'), 584);
        assert_eq!(m.units('\u{2022}'), 350);
    }

    #[test]
    fn unknown_chars_use_default_width() {
        let m = StandardFontMetrics::helvetica_bold();
        assert_eq!(m.units('\u{4E2D}'), 611);
    }
}
