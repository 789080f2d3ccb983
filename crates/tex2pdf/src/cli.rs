//! CLI argument structure using clap

use clap::Parser;
use std::path::PathBuf;
use tex2pdf_engine::Engine;

#[derive(Parser)]
#[command(name = "tex2pdf")]
#[command(version, about = "Convert TeX documents to PDF", long_about = None)]
pub struct Cli {
    /// TeX document to convert
    pub input: Option<PathBuf>,

    /// Output PDF path (defaults to the input with a .pdf extension)
    pub output: Option<PathBuf>,

    /// LaTeX engine to invoke
    #[arg(short, long, default_value = "pdflatex", value_parser = parse_engine)]
    pub engine: Engine,

    /// Install the vendored LaTeX distribution and exit
    #[arg(long)]
    pub install: bool,

    /// Root directory for the vendored LaTeX install
    #[arg(long, env = "TEX2PDF_INSTALL_ROOT", value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_engine(s: &str) -> Result<Engine, String> {
    s.parse()
}
