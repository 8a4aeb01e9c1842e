//! # Page Layout Engine
//!
//! Walks a document's blocks in order and turns each one into positioned
//! draw commands on fixed-size pages.
//!
//! ## How It Works
//!
//! There is no intermediate box tree and no infinite canvas to slice up
//! afterwards. The engine keeps one open page and a vertical cursor
//! (the top of the next line box), and every block renderer follows the
//! same steps:
//!
//! 1. Wrap the block's text against the width it will occupy
//! 2. Compute the block's total height from the line count and the theme
//! 3. Ask the canvas for that much room ([`PageCanvas::begin_block`]),
//!    which opens a new page when the block would cross the bottom margin
//! 4. Write the draw commands, then advance the cursor past the block
//!
//! ```text
//! Document ──► render_block ──► Heading / Paragraph / CodeBlock / BlockQuote
//!                                List / Table / ThematicBreak
//!                                        │
//!                                        ▼
//!                                   PageCanvas ──► finalize ──► footer pass ──► pages
//! ```
//!
//! Blocks are never split across pages. A block taller than the printable
//! region is written once and overflows its page.
//!
//! Paragraph runs are stacked, not flowed: each bold, italic or code run
//! of a paragraph is wrapped and placed as its own text block below the
//! previous one.

pub mod canvas;
pub mod footer;
pub mod table;

use serde::Serialize;

use crate::font::StandardFont;
use crate::model::{Block, BlockKind, Document, DocumentHeader, Edges};
use crate::style::{Color, StyleTheme};
use crate::text::inline::{self, RunStyle};
use crate::text::{BrokenLine, TextLayout};

pub use canvas::PageCanvas;

/// Baseline position below the top of a line box, as a fraction of the font size.
pub const ASCENT: f64 = 0.75;
/// Glyph extent below the baseline, as a fraction of the font size.
pub const DESCENT: f64 = 0.25;

/// A finished page: its geometry, what to draw, and where each block landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPage {
    /// Zero-based position in the document.
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
    /// Draw commands in painting order.
    pub commands: Vec<DrawCommand>,
    /// Block placements in layout order. The footer is not a block.
    pub blocks: Vec<BlockPlacement>,
}

impl LayoutPage {
    pub(crate) fn blank(index: usize, width: f64, height: f64, margin: Edges) -> Self {
        Self {
            index,
            width,
            height,
            margin,
            commands: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin.bottom
    }

    /// The text of every Text command on the page, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// One positioned drawing operation. Coordinates are in points with the
/// origin at the page's top-left corner; a Text `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawCommand {
    Text {
        x: f64,
        y: f64,
        text: String,
        font: StandardFont,
        size: f64,
        color: Color,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
}

impl DrawCommand {
    /// The vertical range `(top, bottom)` the command paints into.
    /// Line stroke width is not included.
    pub fn vertical_extent(&self) -> (f64, f64) {
        match self {
            DrawCommand::Text { y, size, .. } => (y - ASCENT * size, y + DESCENT * size),
            DrawCommand::FillRect { y, height, .. } => (*y, y + height),
            DrawCommand::Line { y1, y2, .. } => (y1.min(*y2), y1.max(*y2)),
        }
    }
}

/// Where a block was placed: its top and the height it reserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    pub kind: BlockKind,
    pub y: f64,
    pub height: f64,
}

impl BlockPlacement {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// ── Serializable layout metadata (for the CLI's --layout-json) ───────

/// Layout metadata for all pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub pages: Vec<PageInfo>,
}

/// Layout metadata for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub content_x: f64,
    pub content_y: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub command_count: usize,
    /// True when some block extends past the bottom margin.
    pub overflows: bool,
    pub blocks: Vec<BlockPlacement>,
}

impl LayoutInfo {
    /// Extract serializable layout metadata from laid-out pages.
    pub fn from_pages(pages: &[LayoutPage]) -> Self {
        LayoutInfo {
            pages: pages
                .iter()
                .map(|page| PageInfo {
                    index: page.index,
                    width: page.width,
                    height: page.height,
                    content_x: page.margin.left,
                    content_y: page.margin.top,
                    content_width: page.width - page.margin.horizontal(),
                    content_height: page.height - page.margin.vertical(),
                    command_count: page.commands.len(),
                    overflows: page
                        .blocks
                        .iter()
                        .any(|b| b.bottom() > page.content_bottom() + 1e-6),
                    blocks: page.blocks.clone(),
                })
                .collect(),
        }
    }
}

/// Font, size, color and line pitch for one wrapped text block.
struct TextStyle {
    font: StandardFont,
    size: f64,
    color: Color,
    line_height: f64,
}

pub struct LayoutEngine {
    text_layout: TextLayout,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            text_layout: TextLayout::new(),
        }
    }

    /// Main entry point: lay out a document into stamped pages.
    ///
    /// Always returns at least one page.
    pub fn layout(&self, document: &Document, theme: &StyleTheme) -> Vec<LayoutPage> {
        let mut canvas = PageCanvas::new(&theme.page);

        if let Some(header) = &document.header {
            self.render_header(header, &mut canvas, theme);
        }

        for block in &document.blocks {
            self.render_block(block, &mut canvas, theme);
        }

        let mut pages = canvas.finalize();
        footer::stamp_pages(&mut pages, theme);
        pages
    }

    fn render_block(&self, block: &Block, canvas: &mut PageCanvas, theme: &StyleTheme) {
        match block {
            Block::Heading { level, text } => self.render_heading(*level, text, canvas, theme),
            Block::Paragraph { raw_inline } => self.render_paragraph(raw_inline, canvas, theme),
            Block::CodeBlock { language, lines } => {
                self.render_code_block(language.as_deref(), lines, canvas, theme)
            }
            Block::BlockQuote { text } => self.render_blockquote(text, canvas, theme),
            Block::List {
                items,
                ordered,
                start,
            } => self.render_list(items, *ordered, *start, canvas, theme),
            Block::Table { headers, rows } => {
                table::render_table(&self.text_layout, headers, rows, canvas, theme)
            }
            Block::ThematicBreak => self.render_thematic_break(canvas, theme),
        }
    }

    fn wrap(&self, text: &str, max_width: f64, font: StandardFont, size: f64) -> Vec<BrokenLine> {
        self.text_layout.break_into_lines(text, max_width, font, size)
    }

    /// Write wrapped lines with line `i`'s box starting at `top + i * line_height`.
    fn write_lines(
        &self,
        canvas: &mut PageCanvas,
        lines: &[BrokenLine],
        x: f64,
        top: f64,
        style: &TextStyle,
    ) {
        for (i, line) in lines.iter().enumerate() {
            let text = line.text.trim_end();
            if text.is_empty() {
                continue;
            }
            canvas.write(DrawCommand::Text {
                x,
                y: top + i as f64 * style.line_height + ASCENT * style.size,
                text: text.to_string(),
                font: style.font,
                size: style.size,
                color: style.color,
            });
        }
    }

    /// Wrap `text` to the content width and place it as one block followed by `gap`.
    fn write_text_block(
        &self,
        canvas: &mut PageCanvas,
        kind: BlockKind,
        text: &str,
        style: &TextStyle,
        gap: f64,
    ) {
        let lines = self.wrap(text, canvas.content_width(), style.font, style.size);
        let height = lines.len() as f64 * style.line_height + gap;
        canvas.begin_block(kind, height);
        let (x, top) = (canvas.content_x(), canvas.cursor());
        self.write_lines(canvas, &lines, x, top, style);
        canvas.advance(height);
    }

    fn render_header(&self, header: &DocumentHeader, canvas: &mut PageCanvas, theme: &StyleTheme) {
        let hs = &theme.document_header;
        let style = TextStyle {
            font: StandardFont::HelveticaBold,
            size: hs.title_size,
            color: theme.colors.accent,
            line_height: hs.title_advance,
        };
        let lines = self.wrap(&header.title, canvas.content_width(), style.font, style.size);
        let title_height = lines.len() as f64 * hs.title_advance;
        let date_height = if header.generated_on.is_some() {
            hs.date_advance
        } else {
            0.0
        };

        canvas.begin_block(BlockKind::Header, title_height + date_height);
        let (x, top) = (canvas.content_x(), canvas.cursor());
        self.write_lines(canvas, &lines, x, top, &style);
        canvas.advance(title_height);

        if let Some(date) = &header.generated_on {
            canvas.write(DrawCommand::Text {
                x,
                y: canvas.cursor() + ASCENT * hs.date_size,
                text: format!("Generated on {}", date),
                font: StandardFont::Helvetica,
                size: hs.date_size,
                color: theme.colors.muted,
            });
            canvas.advance(date_height);
        }
    }

    fn render_heading(&self, level: u8, text: &str, canvas: &mut PageCanvas, theme: &StyleTheme) {
        if !(1..=6).contains(&level) {
            log::debug!("Heading level {} clamped to 1..=6", level);
        }
        let hs = theme.heading(level);
        let style = TextStyle {
            font: StandardFont::HelveticaBold,
            size: hs.font_size,
            color: hs.color,
            line_height: hs.font_size * hs.line_height,
        };
        let gap = theme.body.block_gap;
        let rule_gap = if hs.underline {
            theme.body.underline_gap
        } else {
            0.0
        };

        canvas.advance(hs.spacing);

        let content_width = canvas.content_width();
        let lines = self.wrap(text, content_width, style.font, style.size);
        let text_height = lines.len() as f64 * style.line_height;
        canvas.begin_block(BlockKind::Heading, text_height + gap + rule_gap);
        let (x, top) = (canvas.content_x(), canvas.cursor());
        self.write_lines(canvas, &lines, x, top, &style);
        canvas.advance(text_height + gap);

        if hs.underline {
            // The rule sits inside the gap, `rule_gap` above the cursor.
            let width = self
                .text_layout
                .measure_width(text, style.font, style.size)
                .min(content_width);
            let y = canvas.cursor() - rule_gap;
            canvas.write(DrawCommand::Line {
                x1: x,
                y1: y,
                x2: x + width,
                y2: y,
                width: theme.rule.width,
                color: theme.colors.border,
            });
            canvas.advance(rule_gap);
        }
    }

    fn render_paragraph(&self, raw_inline: &str, canvas: &mut PageCanvas, theme: &StyleTheme) {
        let body = &theme.body;
        for run in inline::segment(raw_inline) {
            let text = run.text.trim();
            if text.is_empty() {
                continue;
            }
            let font = match run.style {
                RunStyle::Code => {
                    self.render_inline_code(text, canvas, theme);
                    continue;
                }
                RunStyle::Bold => StandardFont::HelveticaBold,
                RunStyle::Italic => StandardFont::HelveticaOblique,
                RunStyle::Plain => StandardFont::Helvetica,
            };
            let style = TextStyle {
                font,
                size: body.font_size,
                color: theme.colors.secondary,
                line_height: body.font_size * body.line_height,
            };
            self.write_text_block(canvas, BlockKind::Paragraph, text, &style, body.block_gap);
        }
    }

    /// An inline code run: one unwrapped monospace line with a fixed advance.
    fn render_inline_code(&self, text: &str, canvas: &mut PageCanvas, theme: &StyleTheme) {
        let body = &theme.body;
        canvas.begin_block(BlockKind::Paragraph, body.inline_code_advance);
        canvas.write(DrawCommand::Text {
            x: canvas.content_x(),
            y: canvas.cursor() + ASCENT * body.inline_code_size,
            text: text.replace('\n', " "),
            font: StandardFont::Courier,
            size: body.inline_code_size,
            color: theme.colors.accent,
        });
        canvas.advance(body.inline_code_advance);
    }

    fn render_code_block(
        &self,
        language: Option<&str>,
        lines: &[String],
        canvas: &mut PageCanvas,
        theme: &StyleTheme,
    ) {
        let code = &theme.code;
        let header_height = if language.is_some() {
            code.header_height
        } else {
            0.0
        };
        let block_height = lines.len() as f64 * code.line_height + 2.0 * code.padding + header_height;

        canvas.begin_block(BlockKind::CodeBlock, block_height + code.trailing);
        let (x, top) = (canvas.content_x(), canvas.cursor());

        canvas.write(DrawCommand::FillRect {
            x,
            y: top,
            width: canvas.content_width(),
            height: block_height,
            color: theme.colors.code_background,
        });

        if let Some(language) = language {
            let tag_width = (language.chars().count() as f64 * code.tag_char_width
                + code.tag_padding)
                .min(code.tag_max_width);
            canvas.write(DrawCommand::FillRect {
                x,
                y: top,
                width: tag_width,
                height: code.tag_height,
                color: theme.colors.tag_background,
            });
            canvas.write(DrawCommand::Text {
                x: x + code.tag_text_inset,
                y: top + code.tag_baseline,
                text: language.to_uppercase(),
                font: StandardFont::HelveticaBold,
                size: code.tag_font_size,
                color: theme.colors.tag_text,
            });
        }

        // Code lines are never wrapped; long lines run past the block.
        let tab = " ".repeat(code.tab_width);
        let text_top = top + header_height + code.padding;
        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            canvas.write(DrawCommand::Text {
                x: x + code.text_inset,
                y: text_top + i as f64 * code.line_height,
                text: line.replace('\t', &tab),
                font: StandardFont::Courier,
                size: code.font_size,
                color: theme.colors.code_text,
            });
        }

        canvas.advance(block_height + code.trailing);
    }

    fn render_blockquote(&self, text: &str, canvas: &mut PageCanvas, theme: &StyleTheme) {
        let quote = &theme.quote;
        let content_width = canvas.content_width();
        let lines = self.wrap(
            text,
            content_width - quote.inset,
            StandardFont::HelveticaOblique,
            quote.font_size,
        );
        let block_height = lines.len() as f64 * quote.line_height + 2.0 * quote.padding;

        canvas.begin_block(BlockKind::BlockQuote, block_height + quote.trailing);
        let (x, top) = (canvas.content_x(), canvas.cursor());

        canvas.write(DrawCommand::FillRect {
            x,
            y: top,
            width: quote.bar_width,
            height: block_height,
            color: theme.colors.quote_border,
        });
        canvas.write(DrawCommand::FillRect {
            x: x + quote.bar_width,
            y: top,
            width: content_width - quote.bar_width,
            height: block_height,
            color: theme.colors.quote_background,
        });

        for (i, line) in lines.iter().enumerate() {
            let line = line.text.trim_end();
            if line.is_empty() {
                continue;
            }
            canvas.write(DrawCommand::Text {
                x: x + quote.text_offset,
                y: top + quote.padding + i as f64 * quote.line_height,
                text: line.to_string(),
                font: StandardFont::HelveticaOblique,
                size: quote.font_size,
                color: theme.colors.secondary,
            });
        }

        canvas.advance(block_height + quote.trailing);
    }

    /// Each item is its own block: the marker in the left column, the text
    /// wrapped with every line starting at the text column.
    fn render_list(
        &self,
        items: &[String],
        ordered: bool,
        start: u64,
        canvas: &mut PageCanvas,
        theme: &StyleTheme,
    ) {
        let list = &theme.list;
        let style = TextStyle {
            font: StandardFont::Helvetica,
            size: list.font_size,
            color: theme.colors.secondary,
            line_height: list.line_height,
        };
        let x = canvas.content_x();

        for (i, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}.", start.saturating_add(i as u64))
            } else {
                list.bullet.clone()
            };
            let marker_width = self
                .text_layout
                .measure_width(&format!("{} ", marker), style.font, style.size);
            let hang = marker_width.max(list.indent_per_level);
            let wrap_width = canvas.content_width() - list.right_reserve - hang;

            let lines = self.wrap(item.trim(), wrap_width, style.font, style.size);
            let height = lines.len() as f64 * style.line_height + list.item_gap;
            canvas.begin_block(BlockKind::List, height);
            let top = canvas.cursor();

            canvas.write(DrawCommand::Text {
                x,
                y: top + ASCENT * style.size,
                text: marker,
                font: style.font,
                size: style.size,
                color: style.color,
            });
            self.write_lines(canvas, &lines, x + hang, top, &style);
            canvas.advance(height);
        }

        canvas.advance(list.trailing);
    }

    fn render_thematic_break(&self, canvas: &mut PageCanvas, theme: &StyleTheme) {
        let rule = &theme.rule;
        canvas.begin_block(BlockKind::ThematicBreak, rule.gap_before + rule.gap_after);
        canvas.advance(rule.gap_before);
        let (x, y) = (canvas.content_x(), canvas.cursor());
        canvas.write(DrawCommand::Line {
            x1: x,
            y1: y,
            x2: x + canvas.content_width(),
            y2: y,
            width: rule.width,
            color: theme.colors.border,
        });
        canvas.advance(rule.gap_after);
    }
}
