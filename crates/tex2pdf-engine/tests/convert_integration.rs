//! End-to-end conversion tests against fake shell-script engines seeded
//! into a vendored install layout.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tex2pdf_engine::convert::{ConversionRequest, convert};
use tex2pdf_engine::engine::Engine;
use tex2pdf_engine::layout::InstallLayout;
use tex2pdf_engine::locate::Locator;

const INVOCATION_LOG: &str = "engines.log";

/// Installs a fake engine script into the vendored bin directory. The
/// script appends its own name to a log file in the working directory
/// (the input's parent), drains stdin and then runs `body`.
fn seed_engine(layout: &InstallLayout, name: &str, body: &str) {
    let bin_dir = layout.bin_dir();
    fs::create_dir_all(&bin_dir).unwrap();

    let script = format!(
        "#!/bin/sh\necho {name} >> {log}\ncat > /dev/null\n{body}\n",
        name = name,
        log = INVOCATION_LOG,
        body = body,
    );
    let path = bin_dir.join(name);
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    fs::write(layout.marker_path(), b"").unwrap();
}

fn write_input(dir: &Path) -> PathBuf {
    let input = dir.join("doc.tex");
    fs::write(&input, b"\\documentclass{article}\\begin{document}hi\\end{document}").unwrap();
    input
}

fn invoked_engines(input_dir: &Path) -> Vec<String> {
    fs::read_to_string(input_dir.join(INVOCATION_LOG))
        .map(|log| log.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_successful_conversion_writes_pdf() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(&layout, "pdflatex", "printf '%%PDF-1.5 fake-pdf-bytes'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input.clone(), None, Engine::Pdflatex);
    let used = convert(&request, &locator).expect("conversion should succeed");

    assert_eq!(used, Engine::Pdflatex);
    assert_eq!(request.output, docs.join("doc.pdf"));
    let pdf = fs::read(&request.output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"), "output should hold the engine's stdout");
    assert_eq!(invoked_engines(&docs), vec!["pdflatex"]);
}

#[test]
fn test_missing_input_never_spawns_an_engine() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(&layout, "pdflatex", "printf '%%PDF-1.5'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(docs.join("absent.tex"), None, Engine::Pdflatex);
    let err = convert(&request, &locator).unwrap_err();

    assert!(err.to_string().contains("INPUT_NOT_FOUND"));
    assert!(invoked_engines(&docs).is_empty(), "no engine may run");
    assert!(!request.output.exists(), "no output file may be created");
}

#[test]
fn test_font_failure_falls_back_to_xelatex_once() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(
        &layout,
        "pdflatex",
        "echo 'Fatal: Font cmr10 not loadable' >&2\nexit 1",
    );
    seed_engine(&layout, "xelatex", "printf '%%PDF-1.5 from-xelatex'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, None, Engine::Pdflatex);
    let used = convert(&request, &locator).expect("fallback should rescue the conversion");

    assert_eq!(used, Engine::Xelatex);
    assert_eq!(invoked_engines(&docs), vec!["pdflatex", "xelatex"]);
    let pdf = fs::read(&request.output).unwrap();
    assert!(pdf.ends_with(b"from-xelatex"));
}

#[test]
fn test_non_font_failure_does_not_retry() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(
        &layout,
        "pdflatex",
        "echo '! Undefined control sequence.' >&2\nexit 1",
    );
    seed_engine(&layout, "xelatex", "printf '%%PDF-1.5'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, None, Engine::Pdflatex);
    let err = convert(&request, &locator).unwrap_err();

    assert!(err.to_string().contains("ENGINE_EXEC_FAILED"));
    assert!(err.to_string().contains("Undefined control sequence"));
    assert_eq!(invoked_engines(&docs), vec!["pdflatex"], "no fallback");
    assert!(!request.output.exists(), "partial output removed");
}

#[test]
fn test_fallback_failure_is_terminal() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(
        &layout,
        "pdflatex",
        "echo 'Font shape undefined' >&2\nexit 1",
    );
    seed_engine(
        &layout,
        "xelatex",
        "echo 'Font still broken' >&2\nexit 1",
    );

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, None, Engine::Pdflatex);
    let err = convert(&request, &locator).unwrap_err();

    assert!(err.to_string().contains("xelatex"), "error reports the last engine");
    assert_eq!(invoked_engines(&docs), vec!["pdflatex", "xelatex"]);
    assert!(!request.output.exists());
}

#[test]
fn test_explicit_engine_is_never_second_guessed() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(
        &layout,
        "xelatex",
        "echo 'Font cmr10 not loadable' >&2\nexit 1",
    );
    seed_engine(&layout, "pdflatex", "printf '%%PDF-1.5'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, None, Engine::Xelatex);
    let err = convert(&request, &locator).unwrap_err();

    assert!(err.to_string().contains("xelatex"));
    assert_eq!(invoked_engines(&docs), vec!["xelatex"], "no fallback for explicit engines");
}

#[test]
fn test_unresolvable_engine_leaves_preexisting_output_alone() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    // Only pdflatex is installed; lualatex cannot resolve.
    seed_engine(&layout, "pdflatex", "printf '%%PDF-1.5'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);
    let output = docs.join("doc.pdf");
    fs::write(&output, b"%PDF-1.5 from an earlier run").unwrap();

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, None, Engine::Lualatex);
    let err = convert(&request, &locator).unwrap_err();

    assert!(err.to_string().contains("ENGINE_NOT_FOUND"));
    assert!(invoked_engines(&docs).is_empty(), "no engine may run");
    assert_eq!(
        fs::read(&output).unwrap(),
        b"%PDF-1.5 from an earlier run",
        "a run that never wrote anything must not delete the output"
    );
}

#[test]
fn test_explicit_output_path_respected() {
    let temp = TempDir::new().unwrap();
    let layout = InstallLayout::new(temp.path().join("vendored"));
    seed_engine(&layout, "pdflatex", "printf '%%PDF-1.5'");

    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    let input = write_input(&docs);
    let output = temp.path().join("custom-name.pdf");

    let locator = Locator::with_search_path(&layout, None);
    let request = ConversionRequest::new(input, Some(output.clone()), Engine::Pdflatex);
    convert(&request, &locator).unwrap();

    assert!(output.is_file());
}
