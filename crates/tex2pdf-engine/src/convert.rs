//! Engine invocation: TeX document in, PDF out.
//!
//! The engine is run in streaming mode: the input file is wired to the
//! engine's stdin, the output file to its stdout, and stderr is captured
//! for diagnostics. The working directory is the input's parent so relative
//! `\input`/`\include` paths in the document resolve as authors expect.

use crate::engine::Engine;
use crate::locate::Locator;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tex2pdf_core::{Result, Tex2PdfError};

/// Arguments passed to every engine invocation: no prompts, stop at the
/// first error.
const ENGINE_ARGS: [&str; 2] = ["-interaction=nonstopmode", "-halt-on-error"];

/// How much captured stderr is carried into an error message.
const DIAGNOSTICS_LIMIT: usize = 2048;

/// A single TeX-to-PDF conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub engine: Engine,
}

impl ConversionRequest {
    /// When no output path is given, the PDF lands next to the input with
    /// the extension swapped to `.pdf`.
    pub fn new(input: PathBuf, output: Option<PathBuf>, engine: Engine) -> Self {
        let output = output.unwrap_or_else(|| input.with_extension("pdf"));
        Self {
            input,
            output,
            engine,
        }
    }
}

/// Converts `request.input` to a PDF at `request.output`, returning the
/// engine that produced it.
///
/// When the default engine fails and its diagnostics mention fonts, the
/// conversion is retried exactly once with the font-fallback engine. An
/// explicitly requested non-default engine is never second-guessed.
pub fn convert(request: &ConversionRequest, locator: &Locator<'_>) -> Result<Engine> {
    if !request.input.is_file() {
        return Err(Tex2PdfError::InputNotFound(request.input.clone()));
    }

    match run_engine(request.engine, request, locator) {
        Ok(()) => Ok(request.engine),
        Err(first_failure) if request.engine == Engine::DEFAULT && mentions_font(&first_failure) => {
            run_engine(Engine::FONT_FALLBACK, request, locator)?;
            Ok(Engine::FONT_FALLBACK)
        }
        Err(first_failure) => Err(first_failure),
    }
}

/// Runs one engine attempt. The output file is created (truncated) only
/// after the executable and the input have both resolved, and a failure
/// past that point removes whatever the attempt wrote; a failure before it
/// leaves the output path exactly as it was found.
fn run_engine(engine: Engine, request: &ConversionRequest, locator: &Locator<'_>) -> Result<()> {
    let executable = locator
        .engine_executable_path(engine)
        .filter(|path| path.is_file())
        .ok_or_else(|| Tex2PdfError::EngineNotFound(engine.name().to_string()))?;

    let input_file = fs::File::open(&request.input)?;
    let output_file = fs::File::create(&request.output)?;

    let result = spawn_and_wait(engine, &executable, input_file, output_file, request);
    if result.is_err() {
        discard_partial_output(&request.output);
    }
    result
}

fn spawn_and_wait(
    engine: Engine,
    executable: &Path,
    input_file: fs::File,
    output_file: fs::File,
    request: &ConversionRequest,
) -> Result<()> {
    let work_dir = request
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let child = Command::new(executable)
        .args(ENGINE_ARGS)
        .current_dir(work_dir)
        .stdin(Stdio::from(input_file))
        .stdout(Stdio::from(output_file))
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Tex2PdfError::EngineExecFailed(format!(
                "failed to start {}: {}",
                executable.display(),
                e
            ))
        })?;

    let output = child.wait_with_output()?;
    if output.status.success() {
        return Ok(());
    }

    let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
    if diagnostics.len() > DIAGNOSTICS_LIMIT {
        diagnostics.truncate(DIAGNOSTICS_LIMIT);
    }
    Err(Tex2PdfError::EngineExecFailed(format!(
        "{} exited with {}\n{}",
        engine.name(),
        output.status,
        diagnostics.trim_end()
    )))
}

/// Whether the failure diagnostics point at a font problem.
fn mentions_font(error: &Tex2PdfError) -> bool {
    match error {
        Tex2PdfError::EngineExecFailed(diagnostics) => {
            diagnostics.to_lowercase().contains("font")
        }
        _ => false,
    }
}

/// A failed run leaves a truncated or partial file behind; remove it so the
/// caller never sees a broken PDF at the output path.
fn discard_partial_output(output: &Path) {
    let _ = fs::remove_file(output);
}
