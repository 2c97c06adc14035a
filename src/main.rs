//! # Qalam CLI
//!
//! Usage:
//!   qalam scan.txt --font Amiri-Regular.ttf -o scan.pdf
//!   cat scan.txt | qalam --font Amiri-Regular.ttf --config page.json
//!   qalam scan.txt --font Amiri-Regular.ttf --format json > layout.json

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::info;

use qalam::font::FontMetrics;
use qalam::layout::LayoutEngine;
use qalam::model::ExportConfig;
use qalam::QalamError;

/// Shape, justify and paginate Arabic OCR text.
#[derive(Debug, Parser)]
#[command(name = "qalam", about, version)]
struct Cli {
    /// Text file to render. Reads stdin when omitted or "-"
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// TrueType/OpenType font with Arabic glyphs
    #[arg(long, value_name = "FONT")]
    font: PathBuf,

    /// Output path. Defaults to output.pdf, or stdout for JSON
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Page, typography and metadata settings as JSON
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pdf)]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Rendered PDF document
    Pdf,
    /// Laid-out pages with per-word coordinates
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), QalamError> {
    let text = read_input(cli.input.as_ref())?;
    let config = match &cli.config {
        Some(path) => serde_json::from_str::<ExportConfig>(&fs::read_to_string(path)?)?,
        None => ExportConfig::default(),
    };
    let font_data = fs::read(&cli.font).map_err(|e| {
        QalamError::FontError(format!("Failed to read font file '{}': {}", cli.font.display(), e))
    })?;

    let bytes = match cli.format {
        Format::Pdf => qalam::render_pdf(&text, font_data, &config)?,
        Format::Json => {
            let font = FontMetrics::from_font_data(font_data)?;
            let pages = LayoutEngine::from_config(&config).layout(&text, &font);
            let mut json = serde_json::to_vec_pretty(&pages)
                .map_err(|e| QalamError::RenderError(format!("Failed to serialize layout: {}", e)))?;
            json.push(b'\n');
            json
        }
    };

    match (&cli.output, cli.format) {
        (Some(path), _) => write_file(path, &bytes),
        (None, Format::Pdf) => write_file(Path::new("output.pdf"), &bytes),
        (None, Format::Json) => Ok(io::stdout().write_all(&bytes)?),
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, QalamError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), QalamError> {
    fs::write(path, bytes)?;
    info!(bytes = bytes.len(), path = %path.display(), "written");
    eprintln!("✓ Written {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
