//! # Folio
//!
//! A paginated Markdown-to-PDF layout engine.
//!
//! Folio lays a document out directly onto fixed-size pages. There is no
//! browser and no layout library: the engine walks the document's blocks
//! in order, wraps their text with real font metrics, and decides for each
//! block whether it still fits on the current page or starts the next one.
//! The result is a list of pages, each a flat list of positioned draw
//! commands, which the PDF writer turns into bytes.
//!
//! ## Architecture
//!
//! ```text
//! Markdown source
//!       ↓
//!   [tokens::markdown]  : pulldown-cmark events → flat token stream
//!       ↓
//!   [tokens]            : token stream → Document blocks
//!       ↓
//!   [layout]            : blocks → pages of draw commands, then the footer pass
//!       ↓                 (uses [style], [text], [font])
//!   [pdf]               : pages → PDF bytes
//! ```
//!
//! Every stage is deterministic: the same document and theme always give
//! the same pages and the same bytes.

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;
pub mod tokens;

use std::time::Instant;

pub use error::FolioError;
pub use layout::{DrawCommand, LayoutInfo, LayoutPage};
pub use model::{Block, Document, DocumentHeader};
pub use style::StyleTheme;

use layout::LayoutEngine;
use pdf::{PdfMetadata, PdfWriter};

/// Lay a document out into finished pages.
///
/// This is the primary entry point. The theme is validated first; the
/// returned list always holds at least one page, each already carrying
/// its footer.
pub fn render(document: &Document, theme: &StyleTheme) -> Result<Vec<LayoutPage>, FolioError> {
    theme.validate()?;

    let start = Instant::now();
    let pages = LayoutEngine::new().layout(document, theme);
    log::info!(
        "Laid out {} blocks on {} pages in {:.2?}",
        document.blocks.len(),
        pages.len(),
        start.elapsed()
    );
    Ok(pages)
}

/// Render a document to PDF bytes.
pub fn render_pdf(document: &Document, theme: &StyleTheme) -> Result<Vec<u8>, FolioError> {
    let pages = render(document, theme)?;
    let metadata = PdfMetadata {
        title: document.header.as_ref().map(|h| h.title.clone()),
        creation_date: None,
    };
    Ok(PdfWriter::new().write(&pages, &metadata))
}

/// Parse Markdown into a document.
pub fn parse_markdown(source: &str, header: Option<DocumentHeader>) -> Document {
    let tokens = tokens::markdown::tokenize(source);
    let blocks = tokens::blocks_from_tokens(&tokens);
    log::debug!("Parsed {} tokens into {} blocks", tokens.len(), blocks.len());
    Document { header, blocks }
}

/// Render Markdown source to PDF bytes.
///
/// Whitespace-only input is rejected with [`FolioError::EmptyInput`]
/// before any layout happens.
pub fn render_markdown(
    source: &str,
    header: Option<DocumentHeader>,
    theme: &StyleTheme,
) -> Result<Vec<u8>, FolioError> {
    if source.trim().is_empty() {
        return Err(FolioError::EmptyInput);
    }
    render_pdf(&parse_markdown(source, header), theme)
}

/// Render a document described as JSON to PDF bytes.
pub fn render_json(json: &str, theme: &StyleTheme) -> Result<Vec<u8>, FolioError> {
    let document: Document = serde_json::from_str(json)?;
    render_pdf(&document, theme)
}
