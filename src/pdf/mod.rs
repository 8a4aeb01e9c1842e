//! # PDF Serializer
//!
//! Takes the finalized pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. The engine only ever emits three
//! kinds of draw command and draws with the standard Type1 fonts, so the
//! subset of PDF needed is small: no font embedding, no images, one
//! Flate-compressed content stream per page.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, page tree, fonts, pages, streams)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Layout coordinates have their origin at the top-left; PDF user space
//! starts at the bottom-left, so every y is flipped against the page height.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::layout::{DrawCommand, LayoutPage};
use crate::style::Color;

/// Document information written to the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub creation_date: Option<String>,
}

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts in resource order: `/F0`, `/F1`, ...
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write finalized pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &PdfMetadata) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content streams and page objects
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, pages);
        let font_resources = self.build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.objects.len();
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", Self::encode_text(title));
        }
        if let Some(ref date) = metadata.creation_date {
            let _ = write!(info, "/CreationDate ({}) ", Self::encode_text(date));
        }
        let _ = write!(
            info,
            "/Producer (Folio {}) /Creator (Folio) >>",
            env!("CARGO_PKG_VERSION")
        );
        builder.objects.push(PdfObject {
            data: info.into_bytes(),
        });

        let bytes = self.serialize(&builder, info_obj_id);
        log::debug!(
            "Serialized {} pages into {} PDF objects ({} bytes)",
            pages.len(),
            builder.objects.len() - 1,
            bytes.len()
        );
        bytes
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        font_objects: &[(StandardFont, usize)],
    ) -> String {
        let mut stream = String::new();
        for command in &page.commands {
            self.write_command(&mut stream, command, page.height, font_objects);
        }
        stream
    }

    /// Write a single draw command as PDF operators.
    fn write_command(
        &self,
        stream: &mut String,
        command: &DrawCommand,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
    ) {
        match command {
            DrawCommand::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                let idx = Self::font_index(*font, font_objects);
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    color.r,
                    color.g,
                    color.b,
                    idx,
                    size,
                    x,
                    page_height - y,
                    Self::encode_text(text)
                );
            }

            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                if color.a <= 0.0 {
                    return;
                }
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    color.r,
                    color.g,
                    color.b,
                    x,
                    page_height - y - height,
                    width,
                    height
                );
            }

            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                Self::write_stroke(stream, color, *width);
                let _ = write!(
                    stream,
                    "{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    x1,
                    page_height - y1,
                    x2,
                    page_height - y2
                );
            }
        }
    }

    fn write_stroke(stream: &mut String, color: &Color, width: f64) {
        let _ = write!(
            stream,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n",
            color.r, color.g, color.b, width
        );
    }

    /// Register every font used across all pages, in a deterministic order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut fonts: Vec<StandardFont> = pages
            .iter()
            .flat_map(|page| page.commands.iter())
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect();
        fonts.sort();
        fonts.dedup();

        // Always have at least Helvetica
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }

        for font in fonts {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((font, obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (`/F0`, `/F1`, ...) of a registered font.
    fn font_index(font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    /// Encode text as the body of a PDF literal string in WinAnsiEncoding.
    ///
    /// Delimiters are backslash-escaped, bytes outside printable ASCII are
    /// written as octal escapes, and characters WinAnsi cannot represent
    /// become `?`.
    fn encode_text(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                _ => match Self::unicode_to_winansi(ch) {
                    Some(b) if b.is_ascii() => out.push(b as char),
                    Some(b) => {
                        let _ = write!(out, "\\{:03o}", b);
                    }
                    None => out.push('?'),
                },
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            0x0009 => Some(0x20), // Tab, drawn as a space
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edges;

    fn page_with(commands: Vec<DrawCommand>) -> LayoutPage {
        LayoutPage {
            index: 0,
            width: 595.28,
            height: 841.89,
            margin: Edges::uniform(56.69),
            commands,
            blocks: vec![],
        }
    }

    fn text(s: &str, font: StandardFont) -> DrawCommand {
        DrawCommand::Text {
            x: 56.0,
            y: 80.0,
            text: s.to_string(),
            font,
            size: 11.0,
            color: Color::BLACK,
        }
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(PdfWriter::encode_text("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::encode_text("back\\slash"), "back\\\\slash");
        assert_eq!(PdfWriter::encode_text("\u{2022} caf\u{e9}"), "\\225 caf\\351");
        assert_eq!(PdfWriter::encode_text("\u{4E2D}"), "?");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let bytes = PdfWriter::new().write(&[page_with(vec![])], &PdfMetadata::default());

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
        assert!(bytes.windows(4).any(|w| w == b"xref"));
        assert!(bytes.windows(7).any(|w| w == b"trailer"));
        assert!(bytes.windows(10).any(|w| w == b"/Helvetica"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = PdfMetadata {
            title: Some("Test Document".to_string()),
            creation_date: None,
        };
        let bytes = PdfWriter::new().write(&[page_with(vec![])], &metadata);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Test Document)"));
        assert!(text.contains("/Producer (Folio"));
    }

    #[test]
    fn test_fonts_registered_once_each() {
        let page = page_with(vec![
            text("a", StandardFont::Helvetica),
            text("b", StandardFont::HelveticaBold),
            text("c", StandardFont::Helvetica),
            text("d", StandardFont::Courier),
        ]);
        let bytes = PdfWriter::new().write(&[page.clone(), page], &PdfMetadata::default());
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/BaseFont /Helvetica-Bold ").count(), 1);
        assert_eq!(text.matches("/BaseFont /Helvetica ").count(), 1);
        assert_eq!(text.matches("/BaseFont /Courier ").count(), 1);
        assert_eq!(text.matches("/Type /Page ").count(), 2);
    }

    #[test]
    fn test_content_stream_flips_y() {
        let writer = PdfWriter::new();
        let page = page_with(vec![DrawCommand::FillRect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            color: Color::BLACK,
        }]);
        let fonts = vec![(StandardFont::Helvetica, 3)];
        let stream = writer.build_content_stream(&page, &fonts);
        assert!(stream.contains("10.00 781.89 30.00 40.00 re"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfWriter::new().write(
            &[page_with(vec![text("x", StandardFont::Helvetica)])],
            &PdfMetadata::default(),
        );
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref = text.find("xref\n").unwrap();
        let first_entry = text[xref..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }
}
