pub mod convert;
pub mod install;

use anyhow::Context;
use std::path::PathBuf;
use tex2pdf_engine::InstallLayout;

/// Resolves the vendored install root: the `--install-root` flag (or its
/// environment variable) wins, otherwise the OS cache directory.
pub fn resolve_layout(install_root: Option<&PathBuf>) -> anyhow::Result<InstallLayout> {
    if let Some(root) = install_root {
        return Ok(InstallLayout::new(root.clone()));
    }
    let root = InstallLayout::default_root()
        .context("could not determine a cache directory for the vendored LaTeX install")?;
    Ok(InstallLayout::new(root))
}

/// Download progress, invoked at 10% steps when the size is known.
pub fn progress_callback(downloaded: u64, total: u64) {
    let percent = downloaded * 100 / total.max(1);
    println!(
        "  {:>3}% ({:.1} MB / {:.1} MB)",
        percent,
        downloaded as f64 / 1_048_576.0,
        total as f64 / 1_048_576.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_install_root_wins() {
        let root = PathBuf::from("/opt/custom-tex");
        let layout = resolve_layout(Some(&root)).unwrap();
        assert_eq!(layout.root, root);
    }
}
