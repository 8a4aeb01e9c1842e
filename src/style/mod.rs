//! # Style Theme
//!
//! Every geometric and visual constant the block renderers use: page
//! geometry, colors, font sizes, spacing. A theme is an immutable value
//! passed explicitly into [`crate::render`], so two conversions with
//! different themes can run side by side without interfering.
//!
//! The defaults reproduce the on-screen preview the engine was built to
//! match. They were tuned in millimetres on an A4 page; [`MM`] converts
//! them to points.
//!
//! All structs deserialize with `#[serde(default)]`, so a JSON theme file
//! only needs to name the options it overrides.

use crate::error::FolioError;
use crate::model::{Edges, PageSize};
use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM: f64 = 72.0 / 25.4;

/// An RGBA color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The complete, read-only style table for one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleTheme {
    pub page: PageGeometry,
    pub colors: Palette,
    pub document_header: HeaderStyle,
    /// Heading styles for levels 1 through 6.
    pub headings: [HeadingStyle; 6],
    pub body: BodyStyle,
    pub code: CodeStyle,
    pub quote: QuoteStyle,
    pub list: ListStyle,
    pub table: TableStyle,
    pub rule: RuleStyle,
    pub footer: FooterStyle,
}

impl Default for StyleTheme {
    fn default() -> Self {
        let colors = Palette::default();
        Self {
            page: PageGeometry::default(),
            document_header: HeaderStyle::default(),
            headings: [
                HeadingStyle::new(24.0, colors.primary, 10.0 * MM, true),
                HeadingStyle::new(20.0, colors.primary, 8.0 * MM, false),
                HeadingStyle::new(16.0, colors.primary, 6.0 * MM, false),
                HeadingStyle::new(14.0, colors.secondary, 5.0 * MM, false),
                HeadingStyle::new(12.0, colors.secondary, 4.0 * MM, false),
                HeadingStyle::new(11.0, colors.secondary, 3.0 * MM, false),
            ],
            colors,
            body: BodyStyle::default(),
            code: CodeStyle::default(),
            quote: QuoteStyle::default(),
            list: ListStyle::default(),
            table: TableStyle::default(),
            rule: RuleStyle::default(),
            footer: FooterStyle::default(),
        }
    }
}

impl StyleTheme {
    /// Load a theme from JSON. Options not present keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        let theme: StyleTheme = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Check that the page leaves a usable printable region.
    pub fn validate(&self) -> Result<(), FolioError> {
        let (w, h) = self.page.size.dimensions();
        if !(w > 0.0 && h > 0.0) {
            return Err(FolioError::InvalidTheme(format!(
                "page size must be positive, got {}x{}",
                w, h
            )));
        }
        if self.page.content_width() <= 0.0 {
            return Err(FolioError::InvalidTheme(format!(
                "horizontal margins ({}) leave no printable width on a {}pt page",
                self.page.margin.horizontal(),
                w
            )));
        }
        if self.page.content_height() <= 0.0 {
            return Err(FolioError::InvalidTheme(format!(
                "vertical margins ({}) leave no printable height on a {}pt page",
                self.page.margin.vertical(),
                h
            )));
        }
        Ok(())
    }

    /// The style for a heading level, clamping out-of-range levels to 1..=6.
    pub fn heading(&self, level: u8) -> &HeadingStyle {
        let idx = (level.clamp(1, 6) - 1) as usize;
        &self.headings[idx]
    }
}

/// Page size and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub size: PageSize,
    pub margin: Edges,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges {
                top: 20.0 * MM,
                right: 20.0 * MM,
                bottom: 30.0 * MM,
                left: 20.0 * MM,
            },
        }
    }
}

impl PageGeometry {
    pub fn width(&self) -> f64 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.size.dimensions().1
    }

    pub fn content_width(&self) -> f64 {
        self.width() - self.margin.horizontal()
    }

    pub fn content_height(&self) -> f64 {
        self.height() - self.margin.vertical()
    }

    /// The lowest y a write may reach before a break is needed.
    pub fn content_bottom(&self) -> f64 {
        self.height() - self.margin.bottom
    }
}

/// Named colors shared by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub code_background: Color,
    pub code_text: Color,
    pub quote_background: Color,
    pub quote_border: Color,
    pub table_header: Color,
    pub tag_background: Color,
    pub tag_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::hex("#111827"),
            secondary: Color::hex("#374151"),
            accent: Color::hex("#2563eb"),
            muted: Color::hex("#6b7280"),
            border: Color::hex("#e5e7eb"),
            code_background: Color::hex("#1e293b"),
            code_text: Color::hex("#e2e8f0"),
            quote_background: Color::hex("#eff6ff"),
            quote_border: Color::hex("#3b82f6"),
            table_header: Color::hex("#f9fafb"),
            tag_background: Color::hex("#3b82f6"),
            tag_text: Color::WHITE,
        }
    }
}

/// The title block above the first page's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyle {
    pub title_size: f64,
    pub title_advance: f64,
    pub date_size: f64,
    pub date_advance: f64,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            title_size: 28.0,
            title_advance: 12.0 * MM,
            date_size: 10.0,
            date_advance: 20.0 * MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingStyle {
    pub font_size: f64,
    pub color: Color,
    /// Space added above the heading.
    pub spacing: f64,
    /// Draw a rule under the heading text.
    pub underline: bool,
    pub line_height: f64,
}

impl HeadingStyle {
    pub fn new(font_size: f64, color: Color, spacing: f64, underline: bool) -> Self {
        Self {
            font_size,
            color,
            spacing,
            underline,
            line_height: 1.2,
        }
    }
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self::new(11.0, Palette::default().secondary, 3.0 * MM, false)
    }
}

/// Paragraph text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyStyle {
    pub font_size: f64,
    pub line_height: f64,
    /// Gap after every wrapped text block.
    pub block_gap: f64,
    pub inline_code_size: f64,
    /// Fixed advance after an inline code run.
    pub inline_code_advance: f64,
    /// Extra space between a level-1 heading's text and its rule.
    pub underline_gap: f64,
}

impl Default for BodyStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_height: 1.6,
            block_gap: 4.0 * MM,
            inline_code_size: 10.0,
            inline_code_advance: 6.0 * MM,
            underline_gap: 2.0 * MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeStyle {
    pub font_size: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Height of the language tag strip, when a language is present.
    pub header_height: f64,
    pub tag_height: f64,
    pub tag_font_size: f64,
    /// Tag label position inside the tag: left inset and baseline.
    pub tag_text_inset: f64,
    pub tag_baseline: f64,
    /// Tag width per language character, plus padding, up to a cap.
    pub tag_char_width: f64,
    pub tag_padding: f64,
    pub tag_max_width: f64,
    pub text_inset: f64,
    pub trailing: f64,
    pub tab_width: usize,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            line_height: 4.5 * MM,
            padding: 6.0 * MM,
            header_height: 8.0 * MM,
            tag_height: 7.0 * MM,
            tag_font_size: 8.0,
            tag_text_inset: 3.0 * MM,
            tag_baseline: 5.0 * MM,
            tag_char_width: 4.0 * MM,
            tag_padding: 10.0 * MM,
            tag_max_width: 50.0 * MM,
            text_inset: 4.0 * MM,
            trailing: 10.0 * MM,
            tab_width: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteStyle {
    pub font_size: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Width taken from the content width before wrapping.
    pub inset: f64,
    pub bar_width: f64,
    pub text_offset: f64,
    pub trailing: f64,
}

impl Default for QuoteStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_height: 5.5 * MM,
            padding: 6.0 * MM,
            inset: 25.0 * MM,
            bar_width: 4.0 * MM,
            text_offset: 10.0 * MM,
            trailing: 8.0 * MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListStyle {
    pub font_size: f64,
    pub line_height: f64,
    pub item_gap: f64,
    pub trailing: f64,
    pub indent_per_level: f64,
    /// Width kept free at the right edge when wrapping items.
    pub right_reserve: f64,
    pub bullet: String,
}

impl Default for ListStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_height: 5.5 * MM,
            item_gap: 3.0 * MM,
            trailing: 2.0 * MM,
            indent_per_level: 8.0 * MM,
            right_reserve: 20.0 * MM,
            bullet: "\u{2022}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableStyle {
    pub row_height: f64,
    pub cell_padding: f64,
    /// Distance from a row's top edge to its text baseline.
    pub baseline_offset: f64,
    pub header_font_size: f64,
    pub cell_font_size: f64,
    pub trailing: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            row_height: 12.0 * MM,
            cell_padding: 4.0 * MM,
            baseline_offset: 8.0 * MM,
            header_font_size: 11.0,
            cell_font_size: 10.0,
            trailing: 10.0 * MM,
        }
    }
}

/// Thematic breaks and the stroke width of every rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleStyle {
    pub gap_before: f64,
    pub gap_after: f64,
    pub width: f64,
}

impl Default for RuleStyle {
    fn default() -> Self {
        Self {
            gap_before: 8.0 * MM,
            gap_after: 12.0 * MM,
            width: 0.5 * MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterStyle {
    /// Distance of the footer rule above the page's bottom edge.
    pub rule_offset: f64,
    pub rule_width: f64,
    /// Distance of the footer text baseline above the page's bottom edge.
    pub text_offset: f64,
    pub font_size: f64,
    pub credit: String,
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            rule_offset: 15.0 * MM,
            rule_width: 0.3 * MM,
            text_offset: 8.0 * MM,
            font_size: 8.0,
            credit: "Generated by Folio".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let c = Color::hex("#ffffff");
        assert_eq!(c, Color::WHITE);
        let short = Color::hex("f00");
        assert_eq!(
            short,
            Color {
                r: 1.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            }
        );
        assert_eq!(Color::hex("nope"), Color::BLACK);
    }

    #[test]
    fn heading_level_is_clamped() {
        let theme = StyleTheme::default();
        assert_eq!(theme.heading(0), &theme.headings[0]);
        assert_eq!(theme.heading(9), &theme.headings[5]);
        assert!(theme.heading(1).underline);
        assert!(!theme.heading(2).underline);
    }

    #[test]
    fn default_geometry_is_a4() {
        let theme = StyleTheme::default();
        assert!((theme.page.width() - 595.28).abs() < 1e-9);
        assert!((theme.page.margin.top - 56.69).abs() < 0.01);
        assert!(theme.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_options() {
        let theme = StyleTheme::from_json(
            r#"{ "table": { "rowHeight": 20.0 }, "page": { "size": "Letter" } }"#,
        )
        .unwrap();
        assert_eq!(theme.table.row_height, 20.0);
        assert_eq!(theme.table.cell_padding, TableStyle::default().cell_padding);
        assert_eq!(theme.page.size, PageSize::Letter);
        assert_eq!(theme.page.margin, PageGeometry::default().margin);
    }

    #[test]
    fn margins_that_consume_the_page_are_rejected() {
        let mut theme = StyleTheme::default();
        theme.page.margin.top = 500.0;
        theme.page.margin.bottom = 400.0;
        assert!(matches!(theme.validate(), Err(FolioError::InvalidTheme(_))));
    }
}
