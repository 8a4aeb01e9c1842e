//! Markdown parsing into the flat token stream.
//!
//! pulldown-cmark emits nested start/end events with inline formatting as
//! separate events. The layout engine segments inline styles itself, so
//! inline events are folded back into raw markup text (`**`, `*`,
//! backticks) and attached to one `Inline` token per paragraph, heading,
//! list item or table cell.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::{Token, TokenKind};

/// Parse Markdown source into tokens.
///
/// Tables and strikethrough are enabled. Soft and hard breaks both become
/// `\n` in the inline text, so paragraph lines are kept as written.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TokenBuilder::default();
    for event in Parser::new_ext(source, options) {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    /// Inline markup collected since the last block boundary.
    inline: Option<String>,
    /// Fence info and body of the code block being read.
    code: Option<(String, String)>,
}

impl TokenBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, body)) = self.code.as_mut() {
                    body.push_str(&text);
                } else {
                    self.push_inline(&text);
                }
            }
            Event::Code(code) => {
                self.push_inline("`");
                self.push_inline(&code);
                self.push_inline("`");
            }
            Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak | Event::HardBreak => self.push_inline("\n"),
            Event::TaskListMarker(checked) => {
                self.push_inline(if checked { "[x] " } else { "[ ] " })
            }
            Event::Rule => {
                self.flush_inline();
                self.push(TokenKind::Hr);
            }
            Event::Html(_) => {
                self.flush_inline();
                self.push(TokenKind::Other("html_block".to_string()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Strong => self.push_inline("**"),
            Tag::Emphasis => self.push_inline("*"),
            Tag::Strikethrough => self.push_inline("~~"),
            // Links and images keep only their text.
            Tag::Link { .. } | Tag::Image { .. } => {}
            Tag::Paragraph => {
                self.flush_inline();
                self.push(TokenKind::ParagraphOpen);
            }
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.push(TokenKind::HeadingOpen(level as u8));
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.push(TokenKind::BlockquoteOpen);
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((info, String::new()));
            }
            Tag::List(Some(start)) => {
                self.flush_inline();
                self.push(TokenKind::OrderedListOpen(start));
            }
            Tag::List(None) => {
                self.flush_inline();
                self.push(TokenKind::BulletListOpen);
            }
            Tag::Item => {
                self.flush_inline();
                self.push(TokenKind::ListItemOpen);
            }
            Tag::Table(_) => {
                self.flush_inline();
                self.push(TokenKind::TableOpen);
            }
            Tag::TableHead => {
                self.push(TokenKind::TheadOpen);
                self.push(TokenKind::TrOpen);
            }
            Tag::TableRow => self.push(TokenKind::TrOpen),
            Tag::TableCell => {
                self.push(TokenKind::CellOpen);
                self.inline = Some(String::new());
            }
            _ => self.flush_inline(),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Strong => self.push_inline("**"),
            TagEnd::Emphasis => self.push_inline("*"),
            TagEnd::Strikethrough => self.push_inline("~~"),
            TagEnd::Link | TagEnd::Image => {}
            TagEnd::Paragraph => {
                self.flush_inline();
                self.push(TokenKind::ParagraphClose);
            }
            TagEnd::Heading(_) => {
                // An empty heading still carries an (empty) inline token.
                self.inline.get_or_insert_with(String::new);
                self.flush_inline();
                self.push(TokenKind::HeadingClose);
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inline();
                self.push(TokenKind::BlockquoteClose);
            }
            TagEnd::CodeBlock => {
                if let Some((info, body)) = self.code.take() {
                    self.tokens.push(Token::fence(&info, &body));
                }
            }
            TagEnd::List(true) => {
                self.flush_inline();
                self.push(TokenKind::OrderedListClose);
            }
            TagEnd::List(false) => {
                self.flush_inline();
                self.push(TokenKind::BulletListClose);
            }
            TagEnd::Item => {
                self.flush_inline();
                self.push(TokenKind::ListItemClose);
            }
            TagEnd::Table => {
                self.flush_inline();
                self.push(TokenKind::TableClose);
            }
            TagEnd::TableHead => {
                self.push(TokenKind::TrClose);
                self.push(TokenKind::TheadClose);
            }
            TagEnd::TableRow => self.push(TokenKind::TrClose),
            TagEnd::TableCell => {
                // Empty cells still need a token to keep columns aligned.
                self.inline.get_or_insert_with(String::new);
                self.flush_inline();
                self.push(TokenKind::CellClose);
            }
            _ => self.flush_inline(),
        }
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind));
    }

    fn push_inline(&mut self, text: &str) {
        self.inline.get_or_insert_with(String::new).push_str(text);
    }

    fn flush_inline(&mut self) {
        if let Some(content) = self.inline.take() {
            self.tokens.push(Token::inline(content.trim_end_matches('\n')));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::tokens::blocks_from_tokens;

    fn blocks(source: &str) -> Vec<Block> {
        blocks_from_tokens(&tokenize(source))
    }

    #[test]
    fn heading_and_paragraph_markup_is_preserved() {
        let blocks = blocks("# Title\n\nSome **bold**, *italic* and `code`.\n");
        assert_eq!(
            blocks,
            vec![
                Block::heading(1, "Title"),
                Block::paragraph("Some **bold**, *italic* and `code`."),
            ]
        );
    }

    #[test]
    fn soft_breaks_become_newlines() {
        let blocks = blocks("line one\nline two\n");
        assert_eq!(blocks, vec![Block::paragraph("line one\nline two")]);
    }

    #[test]
    fn fenced_code_with_language() {
        let blocks = blocks("```rust\nfn main() {\n\tlet x = 1;\n}\n```\n");
        assert_eq!(
            blocks,
            vec![Block::code(Some("rust"), "fn main() {\n\tlet x = 1;\n}\n")]
        );
    }

    #[test]
    fn tight_and_loose_lists() {
        let blocks = blocks("- one\n- two\n\n3. three\n4. four\n");
        assert_eq!(
            blocks,
            vec![
                Block::bullet_list(&["one", "two"]),
                Block::List {
                    items: vec!["three".into(), "four".into()],
                    ordered: true,
                    start: 3,
                },
            ]
        );
    }

    #[test]
    fn nested_list_is_flattened() {
        let blocks = blocks("- outer\n  - inner\n- last\n");
        assert_eq!(blocks, vec![Block::bullet_list(&["outer", "inner", "last"])]);
    }

    #[test]
    fn table_cells_including_empty() {
        let blocks = blocks("| A | B |\n|---|---|\n| 1 |   |\n| x | y |\n");
        assert_eq!(
            blocks,
            vec![Block::table(&["A", "B"], &[&["1", ""], &["x", "y"]])]
        );
    }

    #[test]
    fn blockquote_and_rule() {
        let blocks = blocks("> quoted *text*\n\n---\n");
        assert_eq!(
            blocks,
            vec![
                Block::BlockQuote {
                    text: "quoted *text*".into()
                },
                Block::ThematicBreak,
            ]
        );
    }

    #[test]
    fn links_keep_their_text() {
        let blocks = blocks("See [the docs](https://example.com).\n");
        assert_eq!(blocks, vec![Block::paragraph("See the docs.")]);
    }
}
