//! `tex2pdf --install`: provision the vendored LaTeX distribution.

use crate::cli::Cli;
use anyhow::Result;
use colored::Colorize;
use std::env;
use tex2pdf_engine::{Locator, ensure_installed};

pub fn run(cli: &Cli) -> Result<()> {
    let layout = super::resolve_layout(cli.install_root.as_ref())?;
    if cli.verbose {
        println!("Install root: {}", layout.root.display());
    }

    let locator = Locator::new(&layout);
    match ensure_installed(&locator, Some(super::progress_callback)) {
        Ok(_) => {
            println!("{} LaTeX distribution available", "✓".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} install failed: {}", "✗".red(), e);
            // Automatic installs report the failure but stay non-fatal; the
            // conversion attempt surfaces its own error afterwards.
            if env::var_os("TEX2PDF_AUTO_INSTALL").is_some() {
                return Ok(());
            }
            Err(e.into())
        }
    }
}
