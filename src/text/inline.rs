//! Inline style segmentation for paragraph text.
//!
//! Splits raw inline markup into styled runs by scanning left to right.
//! At each position the scanner tries, in order, a bold span (`**…**`),
//! an italic span (`*…*`), then an inline code span (`` `…` ``); the
//! first that closes on the same line wins and scanning resumes after
//! it. Spans never nest: markers inside a matched span stay literal.

use serde::Serialize;

/// The style of one inline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStyle {
    Plain,
    Bold,
    Italic,
    Code,
}

/// A maximal span of inline text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineRun {
    pub text: String,
    pub style: RunStyle,
}

impl InlineRun {
    fn new(text: &str, style: RunStyle) -> Self {
        Self {
            text: text.to_string(),
            style,
        }
    }
}

/// Byte offset of the first `marker` at or after `from`, on the same line.
fn find_closing(s: &str, from: usize, marker: &str) -> Option<usize> {
    let rest = &s[from..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    rest[..line_end].find(marker).map(|p| from + p)
}

/// Split raw inline text into an ordered sequence of styled runs.
///
/// Plain runs are emitted as-is, including whitespace-only ones. Styled
/// spans with empty content produce no run.
pub fn segment(raw: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    let flush = |runs: &mut Vec<InlineRun>, start: usize, end: usize| {
        if end > start {
            runs.push(InlineRun::new(&raw[start..end], RunStyle::Plain));
        }
    };

    while i < raw.len() {
        let rest = &raw[i..];

        if rest.starts_with("**") {
            if let Some(close) = find_closing(raw, i + 2, "**") {
                flush(&mut runs, plain_start, i);
                if close > i + 2 {
                    runs.push(InlineRun::new(&raw[i + 2..close], RunStyle::Bold));
                }
                i = close + 2;
                plain_start = i;
                continue;
            }
            // An unclosed "**" is literal text, never the start of italics
            i += 2;
            continue;
        }

        if rest.starts_with('*') {
            if let Some(close) = find_closing(raw, i + 1, "*") {
                flush(&mut runs, plain_start, i);
                runs.push(InlineRun::new(&raw[i + 1..close], RunStyle::Italic));
                i = close + 1;
                plain_start = i;
                continue;
            }
        } else if rest.starts_with('`') {
            if let Some(close) = find_closing(raw, i + 1, "`") {
                flush(&mut runs, plain_start, i);
                if close > i + 1 {
                    runs.push(InlineRun::new(&raw[i + 1..close], RunStyle::Code));
                }
                i = close + 1;
                plain_start = i;
                continue;
            }
        }

        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    flush(&mut runs, plain_start, raw.len());
    runs
}
