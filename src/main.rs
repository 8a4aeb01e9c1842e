//! # Folio CLI
//!
//! Usage:
//!   folio README.md -o readme.pdf
//!   cat notes.md | folio --title "Notes" -o notes.pdf
//!   folio doc.json --json --theme theme.json --layout-json layout.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;

use folio::layout::LayoutInfo;
use folio::pdf::{PdfMetadata, PdfWriter};
use folio::{Document, DocumentHeader, FolioError, StyleTheme};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Lay out Markdown onto fixed PDF pages", long_about = None)]
struct Cli {
    /// Input file (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE", default_value = "output.pdf")]
    output: PathBuf,

    /// Theme overrides as JSON
    #[arg(long, value_name = "FILE")]
    theme: Option<PathBuf>,

    /// Treat the input as a JSON document instead of Markdown
    #[arg(long)]
    json: bool,

    /// Document title (defaults to the input file name)
    #[arg(long)]
    title: Option<String>,

    /// Leave out the title and date block
    #[arg(long)]
    no_header: bool,

    /// Also write the page layout as JSON
    #[arg(long, value_name = "FILE")]
    layout_json: Option<PathBuf>,

    /// Log page breaks and block placement
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), FolioError> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let theme = match &cli.theme {
        Some(path) => StyleTheme::from_json(&fs::read_to_string(path)?)?,
        None => StyleTheme::default(),
    };

    let now = Local::now();
    let document = if cli.json {
        serde_json::from_str::<Document>(&input)?
    } else {
        if input.trim().is_empty() {
            return Err(FolioError::EmptyInput);
        }
        let header = (!cli.no_header).then(|| DocumentHeader {
            title: document_title(cli),
            generated_on: Some(now.format("%B %-d, %Y").to_string()),
        });
        folio::parse_markdown(&input, header)
    };

    let pages = folio::render(&document, &theme)?;

    if let Some(path) = &cli.layout_json {
        let info = LayoutInfo::from_pages(&pages);
        fs::write(path, serde_json::to_string_pretty(&info)?)?;
        log::info!("Wrote layout of {} pages to {}", pages.len(), path.display());
    }

    let metadata = PdfMetadata {
        title: document.header.as_ref().map(|h| h.title.clone()),
        creation_date: Some(now.format("D:%Y%m%d%H%M%S").to_string()),
    };
    let pdf_bytes = PdfWriter::new().write(&pages, &metadata);
    fs::write(&cli.output, &pdf_bytes)?;

    eprintln!(
        "✓ Written {} bytes ({} pages) to {}",
        pdf_bytes.len(),
        pages.len(),
        cli.output.display()
    );
    Ok(())
}

fn document_title(cli: &Cli) -> String {
    if let Some(title) = &cli.title {
        return title.clone();
    }
    cli.input
        .as_ref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Document".to_string())
}
