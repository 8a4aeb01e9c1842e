//! # Token Stream Adapter
//!
//! The Markdown parser hands over a flat token stream in which block
//! structure is expressed by open/close pairs, with `Inline` tokens
//! carrying raw inline markup nested inside them:
//!
//! ```text
//! HeadingOpen(1)  Inline("Title")  HeadingClose
//! BulletListOpen  ListItemOpen  ParagraphOpen  Inline("one")  ParagraphClose  ListItemClose  ...  BulletListClose
//! Fence { info: "rust", content: "fn main() {}\n" }
//! ```
//!
//! [`blocks_from_tokens`] groups that stream into [`Block`]s. Containers
//! (lists, tables, blockquotes) buffer every inline token up to their
//! matching close marker. A stream that ends before a close marker is
//! treated as closed at the end, and token kinds with no block meaning are
//! skipped.

pub mod markdown;

use serde::{Deserialize, Serialize};

use crate::model::Block;

/// The kind of a token in the parser's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    HeadingOpen(u8),
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    /// Raw inline markup; the text lives in `Token::content`.
    Inline,
    /// A fenced or indented code block; `info` holds the fence info string.
    Fence,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    /// An ordered list starting at the given number.
    OrderedListOpen(u64),
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TrOpen,
    TrClose,
    CellOpen,
    CellClose,
    /// A thematic break.
    Hr,
    /// Anything else the parser produced (HTML blocks, footnotes, ...).
    Other(String),
}

/// One token of the parser's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub info: String,
}

impl Token {
    /// A structural token with no content.
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            content: String::new(),
            info: String::new(),
        }
    }

    pub fn inline(content: &str) -> Self {
        Self {
            kind: TokenKind::Inline,
            content: content.to_string(),
            info: String::new(),
        }
    }

    pub fn fence(info: &str, content: &str) -> Self {
        Self {
            kind: TokenKind::Fence,
            content: content.to_string(),
            info: info.to_string(),
        }
    }
}

/// Group a flat token stream into blocks, in document order.
pub fn blocks_from_tokens(tokens: &[Token]) -> Vec<Block> {
    let mut adapter = TokenStreamAdapter { tokens, pos: 0 };
    let mut blocks = Vec::new();
    while let Some(block) = adapter.next_block() {
        blocks.push(block);
    }
    blocks
}

struct TokenStreamAdapter<'a> {
    tokens: &'a [Token],
    pos: usize,
}

/// What a container collected between its open and close markers.
struct Collected<'a> {
    inner: &'a [Token],
    closed: bool,
}

impl<'a> TokenStreamAdapter<'a> {
    /// Advance to the next block. Returns `None` once the stream is exhausted.
    fn next_block(&mut self) -> Option<Block> {
        let tokens: &'a [Token] = self.tokens;
        while self.pos < tokens.len() {
            let token = &tokens[self.pos];
            self.pos += 1;

            let block = match &token.kind {
                TokenKind::HeadingOpen(level) => {
                    let body = self.collect(|k| matches!(k, TokenKind::HeadingOpen(_)), |k| {
                        *k == TokenKind::HeadingClose
                    });
                    self.warn_unclosed(&body, "heading");
                    Some(Block::Heading {
                        level: *level,
                        text: join_inline(body.inner, ""),
                    })
                }
                TokenKind::ParagraphOpen => {
                    let body = self.collect(|k| *k == TokenKind::ParagraphOpen, |k| {
                        *k == TokenKind::ParagraphClose
                    });
                    self.warn_unclosed(&body, "paragraph");
                    Some(Block::Paragraph {
                        raw_inline: join_inline(body.inner, "\n"),
                    })
                }
                TokenKind::Fence => {
                    let info = token.info.split_whitespace().next();
                    Some(Block::code(info, &token.content))
                }
                TokenKind::BlockquoteOpen => {
                    let body = self.collect(|k| *k == TokenKind::BlockquoteOpen, |k| {
                        *k == TokenKind::BlockquoteClose
                    });
                    self.warn_unclosed(&body, "blockquote");
                    Some(Block::BlockQuote {
                        text: join_inline(body.inner, " ").trim().to_string(),
                    })
                }
                TokenKind::BulletListOpen | TokenKind::OrderedListOpen(_) => {
                    let (ordered, start) = match token.kind {
                        TokenKind::OrderedListOpen(start) => (true, start),
                        _ => (false, 1),
                    };
                    // Nested lists of either kind are flattened into this one.
                    let body = self.collect(
                        |k| matches!(k, TokenKind::BulletListOpen | TokenKind::OrderedListOpen(_)),
                        |k| matches!(k, TokenKind::BulletListClose | TokenKind::OrderedListClose),
                    );
                    self.warn_unclosed(&body, "list");
                    let items = inline_contents(body.inner).map(str::to_string).collect();
                    Some(Block::List {
                        items,
                        ordered,
                        start,
                    })
                }
                TokenKind::TableOpen => {
                    let body = self.collect(|k| *k == TokenKind::TableOpen, |k| {
                        *k == TokenKind::TableClose
                    });
                    self.warn_unclosed(&body, "table");
                    Some(table_from_tokens(body.inner))
                }
                TokenKind::Hr => Some(Block::ThematicBreak),
                TokenKind::Other(name) => {
                    log::debug!("Skipping unrecognized token kind {:?}", name);
                    None
                }
                // Stray close markers and bare inline tokens carry no block.
                _ => None,
            };

            if block.is_some() {
                return block;
            }
        }
        None
    }

    /// Take every token up to the close marker matching the open marker
    /// just consumed, and step past that close marker.
    ///
    /// Nested opens of the same construct raise the depth, so their close
    /// markers are kept inside the collected slice.
    fn collect(
        &mut self,
        is_open: impl Fn(&TokenKind) -> bool,
        is_close: impl Fn(&TokenKind) -> bool,
    ) -> Collected<'a> {
        let tokens: &'a [Token] = self.tokens;
        let start = self.pos;
        let mut depth = 0usize;

        while self.pos < tokens.len() {
            let kind = &tokens[self.pos].kind;
            if is_open(kind) {
                depth += 1;
            } else if is_close(kind) {
                if depth == 0 {
                    let inner = &tokens[start..self.pos];
                    self.pos += 1;
                    return Collected {
                        inner,
                        closed: true,
                    };
                }
                depth -= 1;
            }
            self.pos += 1;
        }

        Collected {
            inner: &tokens[start..],
            closed: false,
        }
    }

    fn warn_unclosed(&self, body: &Collected<'_>, what: &str) {
        if !body.closed {
            log::warn!(
                "Malformed token stream: {} opened but never closed, closing at end of input",
                what
            );
        }
    }
}

fn inline_contents<'t>(tokens: &'t [Token]) -> impl Iterator<Item = &'t str> {
    tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Inline)
        .map(|t| t.content.as_str())
}

fn join_inline(tokens: &[Token], separator: &str) -> String {
    inline_contents(tokens).collect::<Vec<_>>().join(separator)
}

/// Build a Table block from the tokens between `TableOpen` and `TableClose`.
fn table_from_tokens(tokens: &[Token]) -> Block {
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut in_header = false;
    let mut current_row: Vec<String> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::TheadOpen => in_header = true,
            TokenKind::TheadClose => in_header = false,
            TokenKind::TrOpen => current_row.clear(),
            TokenKind::TrClose => {
                if in_header {
                    headers.append(&mut current_row);
                } else {
                    rows.push(std::mem::take(&mut current_row));
                }
            }
            TokenKind::Inline => current_row.push(token.content.clone()),
            _ => {}
        }
    }

    // A row cut off by the end of the stream still counts.
    if !current_row.is_empty() {
        if in_header {
            headers.append(&mut current_row);
        } else {
            rows.push(current_row);
        }
    }

    Block::Table { headers, rows }
}
