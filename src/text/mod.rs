//! # Text Layout
//!
//! Width-constrained line breaking and text measurement.
//!
//! Breaking is greedy: characters are added to the current line until the
//! next one would overflow, then the line ends at the last UAX#14 break
//! opportunity. A word wider than the whole line is force-broken between
//! characters. Explicit newlines always end a line.

pub mod inline;

use crate::font::StandardFont;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text as a string, trailing break spaces included.
    pub text: String,
    /// Width of the line excluding trailing spaces.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position (i.e. "can we break before
/// char[i]?"). Index 0 is always `None` (no break before the first char).
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields (byte_offset, opportunity) where byte_offset is the
    // position AFTER the break, i.e. the start of the next segment.
    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Always returns at least one line; an empty string gives one empty
    /// line. A non-positive `max_width` puts every character on its own line.
    pub fn break_into_lines(
        &self,
        text: &str,
        max_width: f64,
        font: StandardFont,
        font_size: f64,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    font.char_width(ch, font_size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            // UAX#14 break opportunities: a break *before* char[i] means
            // we can end the previous line at char[i-1].
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                        // "\r\n" leaves the '\r' behind the '\n'; both are dropped.
                        let end = if end > line_start && chars[end - 1] == '\r' {
                            end - 1
                        } else {
                            end
                        }
                        .max(line_start);
                        lines.push(self.make_line(&chars[line_start..end], &widths[line_start..end]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        last_break_point = Some(i - 1);
                    }
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            let char_width = widths[i];
            if line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|&bp| bp >= line_start) {
                    // bp is the last char on this line (the break is *after* bp)
                    lines.push(self.make_line(&chars[line_start..=bp], &widths[line_start..=bp]));
                    line_start = bp + 1;
                    line_width = widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    // The carried-over word can itself be too wide
                    if line_width > max_width && line_start < i {
                        lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                        line_start = i;
                        line_width = char_width;
                    }
                    continue;
                }

                // No break point: force break at current position
                lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            let end = chars.len();
            let trimmed_end = chars[line_start..end]
                .iter()
                .rposition(|&c| !is_newline(c))
                .map(|p| line_start + p + 1)
                .unwrap_or(line_start);
            lines.push(self.make_line(&chars[line_start..trimmed_end], &widths[line_start..trimmed_end]));
        }

        if lines.is_empty() {
            lines.push(BrokenLine {
                text: String::new(),
                width: 0.0,
            });
        }

        lines
    }

    /// Create a BrokenLine from characters and their widths.
    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut effective_width: f64 = widths.iter().sum();

        // Trim trailing spaces from width calculation
        let mut i = chars.len();
        while i > 0 && chars[i - 1] == ' ' {
            i -= 1;
            effective_width -= widths[i];
        }

        BrokenLine {
            text: chars.iter().collect(),
            width: effective_width,
        }
    }

    /// Measure the width of a string on a single line.
    pub fn measure_width(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        font.measure(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str, max_width: f64) -> Vec<BrokenLine> {
        TextLayout::new().break_into_lines(text, max_width, StandardFont::Helvetica, 12.0)
    }

    #[test]
    fn test_single_line() {
        let lines = wrap("Hello", 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello");
    }

    #[test]
    fn test_line_break_at_space() {
        let lines = wrap("Hello World", 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello ");
        assert_eq!(lines[1].text, "World");
        // Trailing space does not count toward the width
        let hello = StandardFont::Helvetica.measure("Hello", 12.0);
        assert!((lines[0].width - hello).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_newline() {
        let lines = wrap("Hello\nWorld", 200.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_crlf_newline() {
        let lines = wrap("one\r\ntwo", 200.0);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let lines = wrap("Hello\n", 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello");
    }

    #[test]
    fn test_empty_string() {
        let lines = wrap("", 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 0.0);
    }

    #[test]
    fn test_long_word_is_force_broken() {
        let lines = wrap("Supercalifragilisticexpialidocious", 50.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 50.0 + 1e-9, "line too wide: {:?}", line);
        }
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, "Supercalifragilisticexpialidocious");
    }

    #[test]
    fn test_every_line_fits() {
        let text = "The quick brown fox jumps over the lazy dog and keeps running far away";
        let lines = wrap(text, 120.0);
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(line.width <= 120.0 + 1e-9);
        }
    }

    #[test]
    fn test_zero_width_breaks_every_char() {
        let lines = wrap("abc", 0.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "a");
    }
}
