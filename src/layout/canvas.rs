//! # Page Canvas
//!
//! Owns the page list and the vertical cursor. Every renderer asks the
//! canvas for room before it writes; the canvas is the only place a page
//! is ever closed and a new one opened.
//!
//! Blocks are never split. A block that does not fit moves to the next
//! page as a whole, and a block that is taller than a whole page is
//! written once, on a page of its own, overflowing the bottom margin.

use super::{BlockPlacement, DrawCommand, LayoutPage};
use crate::model::{BlockKind, Edges};
use crate::style::PageGeometry;

/// What to do with a block of a given height at the current cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// The block fits, or there is nowhere better to put it.
    Place,
    /// Close this page and place the block at the top of the next one.
    MoveToNextPage,
}

/// Decide whether a block starting at `cursor` needs a fresh page.
///
/// A pristine page (nothing written, cursor at the top margin) never
/// breaks: the next page would offer exactly the same room.
pub fn decide_break(cursor: f64, required_height: f64, limit: f64, pristine: bool) -> BreakDecision {
    if cursor + required_height > limit && !pristine {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::Place
    }
}

pub struct PageCanvas {
    width: f64,
    height: f64,
    margin: Edges,
    cursor: f64,
    current: LayoutPage,
    pages: Vec<LayoutPage>,
}

impl PageCanvas {
    /// Open the first page.
    pub fn new(geometry: &PageGeometry) -> Self {
        let (width, height) = geometry.size.dimensions();
        let margin = geometry.margin;
        Self {
            width,
            height,
            margin,
            cursor: margin.top,
            current: LayoutPage::blank(0, width, height, margin),
            pages: Vec::new(),
        }
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn content_x(&self) -> f64 {
        self.margin.left
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margin.horizontal()
    }

    /// The lowest y a block may extend to.
    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin.bottom
    }

    /// Index of the page currently open.
    pub fn page_index(&self) -> usize {
        self.current.index
    }

    pub fn is_pristine(&self) -> bool {
        self.cursor == self.margin.top && self.current.commands.is_empty()
    }

    /// Make sure `required_height` fits below the cursor, opening a new
    /// page if it does not. Returns true when a break happened.
    pub fn ensure_space(&mut self, required_height: f64) -> bool {
        match decide_break(
            self.cursor,
            required_height,
            self.content_bottom(),
            self.is_pristine(),
        ) {
            BreakDecision::Place => false,
            BreakDecision::MoveToNextPage => {
                self.new_page();
                true
            }
        }
    }

    /// `ensure_space` for a whole block, recording where the block lands.
    pub fn begin_block(&mut self, kind: BlockKind, height: f64) -> bool {
        let broke = self.ensure_space(height);
        if height > self.content_bottom() - self.cursor {
            log::debug!(
                "{:?} block of height {:.1}pt overflows page {}",
                kind,
                height,
                self.current.index + 1
            );
        }
        self.current.blocks.push(BlockPlacement {
            kind,
            y: self.cursor,
            height,
        });
        broke
    }

    /// Move the cursor down. Never clamps and never breaks.
    pub fn advance(&mut self, amount: f64) {
        self.cursor += amount;
    }

    /// Append a draw command to the open page.
    pub fn write(&mut self, command: DrawCommand) {
        self.current.commands.push(command);
    }

    fn new_page(&mut self) {
        let index = self.current.index + 1;
        let next = LayoutPage::blank(index, self.width, self.height, self.margin);
        let closed = std::mem::replace(&mut self.current, next);
        log::debug!(
            "Page break after page {} at y={:.1}",
            closed.index + 1,
            self.cursor
        );
        self.pages.push(closed);
        self.cursor = self.margin.top;
    }

    /// Close the open page and hand over every page, in order.
    pub fn finalize(mut self) -> Vec<LayoutPage> {
        self.pages.push(self.current);
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageSize;
    use crate::style::Color;

    fn geometry() -> PageGeometry {
        PageGeometry {
            size: PageSize::Custom {
                width: 200.0,
                height: 300.0,
            },
            margin: Edges::uniform(50.0),
        }
    }

    fn mark(canvas: &mut PageCanvas) {
        canvas.write(DrawCommand::FillRect {
            x: 0.0,
            y: canvas.cursor(),
            width: 1.0,
            height: 1.0,
            color: Color::BLACK,
        });
    }

    #[test]
    fn test_fits() {
        assert_eq!(decide_break(50.0, 100.0, 250.0, false), BreakDecision::Place);
        assert_eq!(decide_break(150.0, 100.0, 250.0, false), BreakDecision::Place);
    }

    #[test]
    fn test_overflow_moves() {
        assert_eq!(
            decide_break(150.1, 100.0, 250.0, false),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn test_pristine_page_never_breaks() {
        assert_eq!(decide_break(50.0, 1000.0, 250.0, true), BreakDecision::Place);
    }

    #[test]
    fn ensure_space_opens_a_new_page() {
        let mut canvas = PageCanvas::new(&geometry());
        assert!(!canvas.ensure_space(120.0));
        mark(&mut canvas);
        canvas.advance(120.0);
        assert!(canvas.ensure_space(100.0));
        assert_eq!(canvas.page_index(), 1);
        assert_eq!(canvas.cursor(), 50.0);
        assert!(canvas.is_pristine());

        let pages = canvas.finalize();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].commands.len(), 1);
        assert!(pages[1].commands.is_empty());
    }

    #[test]
    fn oversized_block_stays_on_fresh_page() {
        let mut canvas = PageCanvas::new(&geometry());
        assert!(!canvas.begin_block(BlockKind::CodeBlock, 1000.0));
        mark(&mut canvas);
        canvas.advance(1000.0);
        let pages = canvas.finalize();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks[0].y, 50.0);
        assert_eq!(pages[0].blocks[0].height, 1000.0);
    }

    #[test]
    fn advance_alone_is_not_pristine() {
        let mut canvas = PageCanvas::new(&geometry());
        canvas.advance(10.0);
        assert!(!canvas.is_pristine());
        assert!(canvas.ensure_space(500.0));
    }

    #[test]
    fn empty_canvas_finalizes_to_one_page() {
        let pages = PageCanvas::new(&geometry()).finalize();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].index, 0);
        assert_eq!(pages[0].width, 200.0);
    }
}
