//! Alias repair for the vendored binary directory.
//!
//! The distribution ships the engines under their core binary names
//! (`pdftex`, `tex`, `luatex`, `xetex`) and occasionally ships dangling
//! symlinks. A repair pass prunes broken links, then makes sure every
//! engine is reachable under its common alias name, preferring a symlink
//! and falling back to a plain file copy.

use crate::install::InstallError;
use crate::platform::{detect_os, exe_name};
use std::fs;
use std::path::Path;

/// Fixed (underlying-engine, alias-name) pairs the repair pass maintains.
pub const ENGINE_ALIASES: [(&str, &str); 4] = [
    ("pdftex", "pdflatex"),
    ("tex", "latex"),
    ("luatex", "lualatex"),
    ("xetex", "xelatex"),
];

/// Outcome of a repair pass. Failures to create an alias are reported here
/// rather than silently discarded.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// Whether the vendored binary directory exists at all.
    pub bin_dir_exists: bool,
    /// Broken or uninspectable entries deleted during the prune phase.
    pub removed: usize,
    /// Alias names created this pass (by symlink or copy).
    pub created: Vec<String>,
    /// Alias names whose base binary exists but which could not be created.
    pub unresolved: Vec<String>,
}

/// Prunes broken symlinks and re-creates missing engine aliases in
/// `bin_dir`. Idempotent: a second pass performs no deletions or creations.
pub fn repair_aliases(bin_dir: &Path) -> Result<RepairReport, InstallError> {
    let mut report = RepairReport::default();

    if !bin_dir.is_dir() {
        return Ok(report);
    }
    report.bin_dir_exists = true;

    prune_broken_entries(bin_dir, &mut report)?;

    let os = detect_os();
    for (base, alias) in ENGINE_ALIASES {
        let base_path = bin_dir.join(exe_name(base, os));
        let alias_path = bin_dir.join(exe_name(alias, os));

        // Aliases are never fabricated without a base binary and never
        // overwritten.
        if !base_path.exists() || alias_path.symlink_metadata().is_ok() {
            continue;
        }

        let linked = create_alias_link(&base_path, &alias_path).is_ok();
        if linked || fs::copy(&base_path, &alias_path).is_ok() {
            report.created.push(alias.to_string());
        } else {
            report.unresolved.push(alias.to_string());
        }
    }

    Ok(report)
}

fn prune_broken_entries(bin_dir: &Path, report: &mut RepairReport) -> Result<(), InstallError> {
    let entries = fs::read_dir(bin_dir).map_err(|e| InstallError::Io {
        operation: format!("read binary directory {}", bin_dir.display()),
        source: e,
    })?;

    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();

        match path.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => {
                // A symlink whose target is inaccessible is dangling.
                if fs::metadata(&path).is_err() && fs::remove_file(&path).is_ok() {
                    report.removed += 1;
                }
            }
            Ok(_) => {}
            Err(_) => {
                // Cannot even inspect the entry; delete best-effort.
                if fs::remove_file(&path).is_ok() {
                    report.removed += 1;
                }
            }
        }
    }

    Ok(())
}

#[cfg(unix)]
fn create_alias_link(base_path: &Path, alias_path: &Path) -> std::io::Result<()> {
    // Relative target keeps the tree relocatable.
    let target = base_path
        .file_name()
        .ok_or_else(|| std::io::Error::other("base binary has no file name"))?;
    std::os::unix::fs::symlink(target, alias_path)
}

#[cfg(windows)]
fn create_alias_link(base_path: &Path, alias_path: &Path) -> std::io::Result<()> {
    // Usually fails without elevation; the caller falls back to a copy.
    std::os::windows::fs::symlink_file(base_path, alias_path)
}
