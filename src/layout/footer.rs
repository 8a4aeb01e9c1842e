//! # Footer Pass
//!
//! Runs once over the finalized pages, after the page count is known.
//! Each page gets a separator rule, a centered "Page N of T" label and
//! the credit line, all inside the bottom margin. Block placements and
//! page geometry are left untouched.

use super::{DrawCommand, LayoutPage};
use crate::font::StandardFont;
use crate::style::StyleTheme;

pub fn stamp_pages(pages: &mut [LayoutPage], theme: &StyleTheme) {
    let footer = &theme.footer;
    let total = pages.len();

    for page in pages.iter_mut() {
        let left = page.margin.left;
        let right = page.width - page.margin.right;
        let rule_y = page.height - footer.rule_offset;
        let text_y = page.height - footer.text_offset;

        page.commands.push(DrawCommand::Line {
            x1: left,
            y1: rule_y,
            x2: right,
            y2: rule_y,
            width: footer.rule_width,
            color: theme.colors.border,
        });

        let label = format!("Page {} of {}", page.index + 1, total);
        let label_width = StandardFont::Helvetica.measure(&label, footer.font_size);
        page.commands.push(DrawCommand::Text {
            x: (page.width - label_width) / 2.0,
            y: text_y,
            text: label,
            font: StandardFont::Helvetica,
            size: footer.font_size,
            color: theme.colors.muted,
        });

        if !footer.credit.is_empty() {
            page.commands.push(DrawCommand::Text {
                x: left,
                y: text_y,
                text: footer.credit.clone(),
                font: StandardFont::Helvetica,
                size: footer.font_size,
                color: theme.colors.muted,
            });
        }
    }

    log::debug!("Stamped footers on {} pages", total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edges;

    fn blank_pages(n: usize) -> Vec<LayoutPage> {
        (0..n)
            .map(|i| LayoutPage::blank(i, 600.0, 800.0, Edges::uniform(50.0)))
            .collect()
    }

    #[test]
    fn every_page_is_numbered() {
        let mut pages = blank_pages(3);
        stamp_pages(&mut pages, &StyleTheme::default());
        for (i, page) in pages.iter().enumerate() {
            let label = format!("Page {} of 3", i + 1);
            assert!(page.texts().any(|t| t == label));
            assert!(page.texts().any(|t| t == "Generated by Folio"));
            assert_eq!(page.commands.len(), 3);
            assert!(page.blocks.is_empty());
        }
    }

    #[test]
    fn label_is_centered() {
        let mut pages = blank_pages(1);
        let theme = StyleTheme::default();
        stamp_pages(&mut pages, &theme);
        match &pages[0].commands[1] {
            DrawCommand::Text { x, text, size, .. } => {
                let width = StandardFont::Helvetica.measure(text, *size);
                assert!((x + width / 2.0 - 300.0).abs() < 1e-9);
            }
            other => panic!("expected page label, got {:?}", other),
        }
    }

    #[test]
    fn empty_credit_is_omitted() {
        let mut pages = blank_pages(1);
        let mut theme = StyleTheme::default();
        theme.footer.credit.clear();
        stamp_pages(&mut pages, &theme);
        assert_eq!(pages[0].commands.len(), 2);
    }

    #[test]
    fn footer_sits_below_the_content_area() {
        let theme = StyleTheme::default();
        let mut pages = vec![LayoutPage::blank(0, 595.28, 841.89, theme.page.margin)];
        stamp_pages(&mut pages, &theme);
        for cmd in &pages[0].commands {
            let (top, _) = cmd.vertical_extent();
            assert!(top > pages[0].content_bottom());
        }
    }
}
