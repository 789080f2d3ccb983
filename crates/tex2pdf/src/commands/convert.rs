//! Default command: convert a TeX document to PDF, installing a LaTeX
//! distribution on first use when none is found.

use crate::cli::Cli;
use anyhow::{Result, bail};
use colored::Colorize;
use std::time::Instant;
use tex2pdf_engine::{ConversionRequest, Locator, convert, ensure_installed};

pub fn run(cli: &Cli) -> Result<()> {
    let Some(input) = cli.input.clone() else {
        bail!("no input file given");
    };

    let layout = super::resolve_layout(cli.install_root.as_ref())?;
    let locator = Locator::new(&layout);

    if locator.resolve().is_none() {
        println!("No LaTeX installation found; installing one...");
        if let Err(e) = ensure_installed(&locator, Some(super::progress_callback)) {
            eprintln!("{} automatic install failed: {}", "✗".red(), e);
        }
    }

    let Some(location) = locator.resolve() else {
        bail!(
            "no usable LaTeX installation was found.\n\
             Run `tex2pdf --install` to provision one, or install a TeX \
             distribution and make sure pdflatex is on PATH"
        );
    };

    if cli.verbose {
        println!("Using {} ({})", location.origin, location.bin_dir.display());
        println!("Engine: {}", cli.engine);
    }

    let request = ConversionRequest::new(input, cli.output.clone(), cli.engine);
    let started = Instant::now();

    match convert(&request, &locator) {
        Ok(used) => {
            if used != cli.engine {
                println!(
                    "{} {} failed on a font problem, retried with {}",
                    "→".yellow(),
                    cli.engine,
                    used
                );
            }
            println!(
                "{} {} ({} ms)",
                "✓".green(),
                request.output.display(),
                started.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} conversion failed", "✗".red());
            if let Some(line) = first_compile_error_line(&e.to_string()) {
                eprintln!("  {}", line);
                eprintln!("  Fix the TeX source and retry.");
            }
            Err(e.into())
        }
    }
}

/// TeX compile errors start their diagnostic line with `!`.
fn first_compile_error_line(diagnostics: &str) -> Option<&str> {
    diagnostics
        .lines()
        .map(str::trim_start)
        .find(|line| line.starts_with('!'))
}
