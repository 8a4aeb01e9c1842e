//! # Document Model
//!
//! The input representation for the layout engine. A document is a flat,
//! ordered sequence of blocks, produced once per conversion from the
//! parser's token stream (see [`crate::tokens`]) or supplied directly as
//! JSON, and never mutated while it is being laid out.
//!
//! There is no tree here: Markdown's block structure is shallow enough
//! that every container (list, table, blockquote) is collapsed into a
//! single variant carrying its buffered text.

use serde::{Deserialize, Serialize};

/// A complete document ready for layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Optional title block drawn at the top of the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<DocumentHeader>,

    /// The top-level blocks, in reading order.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            header: None,
            blocks,
        }
    }

    pub fn with_header(mut self, header: DocumentHeader) -> Self {
        self.header = Some(header);
        self
    }
}

/// Title and generation date printed above the first block.
///
/// The date is passed in rather than read from the clock, so laying out
/// the same document twice always gives the same pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_on: Option<String>,
}

/// A top-level structural unit of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Block {
    /// A heading. Levels outside 1..=6 are clamped at layout time.
    Heading { level: u8, text: String },

    /// A paragraph holding raw inline markup (`**bold**`, `*italic*`, `` `code` ``).
    Paragraph { raw_inline: String },

    /// A fenced or indented code block, one entry per source line.
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        lines: Vec<String>,
    },

    /// A blockquote, with all nested inline content joined into one string.
    BlockQuote { text: String },

    /// A single-level list. Nested items are flattened into `items`.
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
        /// First number of an ordered list.
        #[serde(default = "default_list_start")]
        start: u64,
    },

    /// A table with equal-width columns, one per header.
    Table {
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
    },

    /// A horizontal rule.
    ThematicBreak,
}

fn default_list_start() -> u64 {
    1
}

/// The kind of a block, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// The document title block. Not part of `Document::blocks`.
    Header,
    Heading,
    Paragraph,
    CodeBlock,
    BlockQuote,
    List,
    Table,
    ThematicBreak,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::CodeBlock { .. } => BlockKind::CodeBlock,
            Block::BlockQuote { .. } => BlockKind::BlockQuote,
            Block::List { .. } => BlockKind::List,
            Block::Table { .. } => BlockKind::Table,
            Block::ThematicBreak => BlockKind::ThematicBreak,
        }
    }

    /// Create a Heading block.
    pub fn heading(level: u8, text: &str) -> Self {
        Block::Heading {
            level,
            text: text.to_string(),
        }
    }

    /// Create a Paragraph block from raw inline markup.
    pub fn paragraph(raw_inline: &str) -> Self {
        Block::Paragraph {
            raw_inline: raw_inline.to_string(),
        }
    }

    /// Create a CodeBlock from source text, splitting it into lines.
    ///
    /// A single trailing newline (as fenced code always carries) does not
    /// produce an extra empty line.
    pub fn code(language: Option<&str>, source: &str) -> Self {
        let source = source.strip_suffix('\n').unwrap_or(source);
        Block::CodeBlock {
            language: language
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            lines: source.split('\n').map(str::to_string).collect(),
        }
    }

    /// Create an unordered List block.
    pub fn bullet_list(items: &[&str]) -> Self {
        Block::List {
            items: items.iter().map(|s| s.to_string()).collect(),
            ordered: false,
            start: 1,
        }
    }

    /// Create an ordered List block numbered from 1.
    pub fn ordered_list(items: &[&str]) -> Self {
        Block::List {
            items: items.iter().map(|s| s.to_string()).collect(),
            ordered: true,
            start: 1,
        }
    }

    /// Create a Table block.
    pub fn table(headers: &[&str], rows: &[&[&str]]) -> Self {
        Block::Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left), used for page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_block_drops_single_trailing_newline() {
        let block = Block::code(Some("rust"), "fn main() {}\n");
        match block {
            Block::CodeBlock { language, lines } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(lines, vec!["fn main() {}".to_string()]);
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn code_block_blank_language_is_none() {
        match Block::code(Some("  "), "x") {
            Block::CodeBlock { language, .. } => assert!(language.is_none()),
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn document_from_json() {
        let json = r#"{
            "header": { "title": "Notes" },
            "blocks": [
                { "type": "heading", "level": 2, "text": "Intro" },
                { "type": "paragraph", "rawInline": "Hello **there**" },
                { "type": "list", "items": ["a", "b"], "ordered": true },
                { "type": "thematicBreak" }
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.blocks.len(), 4);
        assert_eq!(doc.header.as_ref().map(|h| h.title.as_str()), Some("Notes"));
        assert_eq!(
            doc.blocks[2],
            Block::List {
                items: vec!["a".to_string(), "b".to_string()],
                ordered: true,
                start: 1,
            }
        );
        assert_eq!(doc.blocks[3].kind(), BlockKind::ThematicBreak);
    }

    #[test]
    fn page_size_dimensions() {
        assert_eq!(PageSize::Letter.dimensions(), (612.0, 792.0));
        let custom = PageSize::Custom {
            width: 100.0,
            height: 200.0,
        };
        assert_eq!(custom.dimensions(), (100.0, 200.0));
    }
}
