//! # Table Renderer
//!
//! Equal-width columns, one per header, and fixed-height rows. The whole
//! table is one block: its height is known up front and it moves to the
//! next page as a unit.
//!
//! Every cell shows only the first line its text wraps to. The remaining
//! lines are dropped, so a row never grows past `row_height`.

use super::{DrawCommand, PageCanvas};
use crate::font::StandardFont;
use crate::model::BlockKind;
use crate::style::StyleTheme;
use crate::text::TextLayout;

/// The first wrapped line of `text` at `max_width`, without trailing spaces.
pub fn first_line(
    text_layout: &TextLayout,
    text: &str,
    max_width: f64,
    font: StandardFont,
    font_size: f64,
) -> String {
    text_layout
        .break_into_lines(text, max_width, font, font_size)
        .into_iter()
        .next()
        .map(|line| line.text.trim_end().to_string())
        .unwrap_or_default()
}

pub fn render_table(
    text_layout: &TextLayout,
    headers: &[String],
    rows: &[Vec<String>],
    canvas: &mut PageCanvas,
    theme: &StyleTheme,
) {
    if headers.is_empty() || rows.is_empty() {
        log::warn!(
            "Skipping unrenderable table: {} header columns, {} rows",
            headers.len(),
            rows.len()
        );
        return;
    }

    let style = &theme.table;
    let columns = headers.len();
    let x = canvas.content_x();
    let width = canvas.content_width();
    let column_width = width / columns as f64;
    let text_width = column_width - 2.0 * style.cell_padding;
    let table_height = (rows.len() + 1) as f64 * style.row_height;

    canvas.begin_block(BlockKind::Table, table_height + style.trailing);
    let top = canvas.cursor();
    let bottom = top + table_height;
    let border = theme.colors.border;
    let stroke = theme.rule.width;
    let line = |x1: f64, y1: f64, x2: f64, y2: f64| DrawCommand::Line {
        x1,
        y1,
        x2,
        y2,
        width: stroke,
        color: border,
    };

    canvas.write(DrawCommand::FillRect {
        x,
        y: top,
        width,
        height: style.row_height,
        color: theme.colors.table_header,
    });

    // Outer border
    canvas.write(line(x, top, x + width, top));
    canvas.write(line(x + width, top, x + width, bottom));
    canvas.write(line(x, bottom, x + width, bottom));
    canvas.write(line(x, top, x, bottom));

    for (i, header) in headers.iter().enumerate() {
        let cell_x = x + i as f64 * column_width;
        let text = first_line(
            text_layout,
            header,
            text_width,
            StandardFont::HelveticaBold,
            style.header_font_size,
        );
        if !text.is_empty() {
            canvas.write(DrawCommand::Text {
                x: cell_x + style.cell_padding,
                y: top + style.baseline_offset,
                text,
                font: StandardFont::HelveticaBold,
                size: style.header_font_size,
                color: theme.colors.primary,
            });
        }
        if i > 0 {
            canvas.write(line(cell_x, top, cell_x, bottom));
        }
    }

    for (r, row) in rows.iter().enumerate() {
        let row_top = top + (r + 1) as f64 * style.row_height;
        canvas.write(line(x, row_top, x + width, row_top));

        if row.len() > columns {
            log::debug!(
                "Table row {} has {} cells for {} columns; extra cells dropped",
                r + 1,
                row.len(),
                columns
            );
        }

        for (c, cell) in row.iter().take(columns).enumerate() {
            let text = first_line(
                text_layout,
                cell,
                text_width,
                StandardFont::Helvetica,
                style.cell_font_size,
            );
            if text.is_empty() {
                continue;
            }
            canvas.write(DrawCommand::Text {
                x: x + c as f64 * column_width + style.cell_padding,
                y: row_top + style.baseline_offset,
                text,
                font: StandardFont::Helvetica,
                size: style.cell_font_size,
                color: theme.colors.secondary,
            });
        }
    }

    canvas.advance(table_height + style.trailing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::model::{Block, Document};

    fn layout_table(block: Block) -> Vec<crate::layout::LayoutPage> {
        LayoutEngine::new().layout(&Document::new(vec![block]), &StyleTheme::default())
    }

    #[test]
    fn first_line_drops_the_rest() {
        let layout = TextLayout::new();
        assert_eq!(
            first_line(&layout, "multi\nline\ncell", 200.0, StandardFont::Helvetica, 10.0),
            "multi"
        );
        let wrapped = first_line(
            &layout,
            "a fairly long sentence that cannot fit",
            60.0,
            StandardFont::Helvetica,
            10.0,
        );
        assert!(StandardFont::Helvetica.measure(&wrapped, 10.0) <= 60.0);
        assert!(wrapped.starts_with("a fairly"));
    }

    #[test]
    fn cells_render_one_line_each() {
        let pages = layout_table(Block::table(&["A", "B"], &[&["multi\nline\ncell", "x"]]));
        let texts: Vec<&str> = pages[0].texts().collect();
        assert_eq!(&texts[..4], &["A", "B", "multi", "x"]);
        assert!(!texts.contains(&"line"));
        assert!(!texts.contains(&"cell"));
    }

    #[test]
    fn table_height_counts_header_row() {
        let theme = StyleTheme::default();
        let pages = layout_table(Block::table(&["A"], &[&["1"], &["2"], &["3"]]));
        let placed = pages[0].blocks[0];
        let expected = 4.0 * theme.table.row_height + theme.table.trailing;
        assert!((placed.height - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_column_table_is_skipped() {
        let pages = layout_table(Block::Table {
            headers: vec![],
            rows: vec![vec!["orphan".into()]],
        });
        assert!(pages[0].blocks.is_empty());
        assert!(!pages[0].texts().any(|t| t == "orphan"));
    }

    #[test]
    fn header_only_table_is_skipped() {
        let pages = layout_table(Block::table(&["Only", "Headers"], &[]));
        assert!(pages[0].blocks.is_empty());
        assert!(!pages[0].texts().any(|t| t == "Only" || t == "Headers"));
        assert!(!pages[0]
            .commands
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::FillRect { .. })));
    }

    #[test]
    fn extra_cells_are_dropped() {
        let pages = layout_table(Block::table(&["A"], &[&["kept", "dropped"]]));
        let texts: Vec<&str> = pages[0].texts().collect();
        assert!(texts.contains(&"kept"));
        assert!(!texts.contains(&"dropped"));
    }
}
