//! Archive extraction with strip-one-leading-component semantics.
//!
//! The distribution archives nest everything under a single top-level
//! folder; stripping the first path component unpacks the tree directly
//! into the install root instead of one level down.

use crate::install::InstallError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Detects the archive kind from a URL or file name suffix.
    pub fn from_name(name: &str) -> Option<ArchiveKind> {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }
}

/// Extracts `archive` into `dest_dir`, stripping one leading path component
/// from every entry.
pub fn extract_archive(
    archive: &Path,
    dest_dir: &Path,
    kind: ArchiveKind,
) -> Result<(), InstallError> {
    fs::create_dir_all(dest_dir).map_err(|e| InstallError::Io {
        operation: format!("create install directory {}", dest_dir.display()),
        source: e,
    })?;

    match kind {
        ArchiveKind::TarGz => extract_tar_gz(archive, dest_dir),
        ArchiveKind::Zip => extract_zip(archive, dest_dir),
    }
}

/// Drops the first component and rejects paths that would escape the
/// destination. Returns `None` for the top-level folder entry itself.
fn strip_first_component(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;

    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        return None;
    }
    let safe = rest
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    safe.then(|| rest.to_path_buf())
}

fn extract_tar_gz(archive: &Path, dest_dir: &Path) -> Result<(), InstallError> {
    let file = fs::File::open(archive).map_err(|e| InstallError::Io {
        operation: format!("open archive {}", archive.display()),
        source: e,
    })?;

    let decompressor = flate2::read::GzDecoder::new(file);
    let mut tarball = tar::Archive::new(decompressor);

    let entries = tarball.entries().map_err(|e| InstallError::ExtractionFailed {
        archive_kind: ArchiveKind::TarGz.label(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| InstallError::ExtractionFailed {
            archive_kind: ArchiveKind::TarGz.label(),
            reason: e.to_string(),
        })?;

        let entry_path = entry
            .path()
            .map_err(|e| InstallError::ExtractionFailed {
                archive_kind: ArchiveKind::TarGz.label(),
                reason: e.to_string(),
            })?
            .into_owned();

        let Some(stripped) = strip_first_component(&entry_path) else {
            continue;
        };
        let out_path = dest_dir.join(stripped);

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::Io {
                operation: format!("create directory {}", parent.display()),
                source: e,
            })?;
        }

        entry
            .unpack(&out_path)
            .map_err(|e| InstallError::ExtractionFailed {
                archive_kind: ArchiveKind::TarGz.label(),
                reason: format!("{}: {}", out_path.display(), e),
            })?;
    }

    Ok(())
}

fn extract_zip(archive: &Path, dest_dir: &Path) -> Result<(), InstallError> {
    let file = fs::File::open(archive).map_err(|e| InstallError::Io {
        operation: format!("open archive {}", archive.display()),
        source: e,
    })?;

    let mut zip = zip::ZipArchive::new(file).map_err(|e| InstallError::ExtractionFailed {
        archive_kind: ArchiveKind::Zip.label(),
        reason: e.to_string(),
    })?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| InstallError::ExtractionFailed {
                archive_kind: ArchiveKind::Zip.label(),
                reason: e.to_string(),
            })?;

        // enclosed_name already rejects traversal; entries without a safe
        // name are skipped.
        let Some(enclosed) = entry.enclosed_name() else {
            continue;
        };
        let Some(stripped) = strip_first_component(&enclosed) else {
            continue;
        };
        let out_path = dest_dir.join(stripped);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| InstallError::Io {
                operation: format!("create directory {}", out_path.display()),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::Io {
                operation: format!("create directory {}", parent.display()),
                source: e,
            })?;
        }

        let mut out_file = fs::File::create(&out_path).map_err(|e| InstallError::Io {
            operation: format!("create file {}", out_path.display()),
            source: e,
        })?;

        io::copy(&mut entry, &mut out_file).map_err(|e| InstallError::Io {
            operation: format!("extract file {}", out_path.display()),
            source: e,
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&out_path, fs::Permissions::from_mode(mode));
        }
    }

    Ok(())
}
