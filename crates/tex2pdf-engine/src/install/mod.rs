//! Downloading and installing the vendored LaTeX distribution.
//!
//! The flow is: pick the platform archive URL, stream it into a temporary
//! file inside the install root, extract it with one leading path component
//! stripped, repair the engine aliases, then write the install marker. The
//! whole sequence runs under an advisory file lock so concurrent first runs
//! of the tool cannot race on the same directory.

mod extract;
pub mod repair;

pub use extract::{ArchiveKind, extract_archive};
pub use repair::{ENGINE_ALIASES, RepairReport, repair_aliases};

use crate::http;
use crate::layout::InstallLayout;
use crate::locate::{EngineOrigin, Locator, vendored_present};
use crate::platform::{detect_os, dist_url};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tex2pdf_core::lock::{LockError, acquire_lock};
use thiserror::Error;

/// How long a second invocation waits for a concurrent install to finish.
const LOCK_TIMEOUT: Duration = Duration::from_secs(600);

/// Progress callback (bytes_downloaded, total_bytes). Only invoked when the
/// server reports a content length, at 10%-of-total increments.
pub type ProgressFn = fn(u64, u64);

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to download {url}: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} stopped after {limit} redirects")]
    TooManyRedirects { url: String, limit: usize },

    #[error("server returned {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to extract {archive_kind} archive: {reason}")]
    ExtractionFailed {
        archive_kind: &'static str,
        reason: String,
    },

    #[error("{operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Makes sure some LaTeX engine is available, installing the vendored
/// distribution when none is found.
///
/// - A system installation short-circuits to `Ok(true)` without touching
///   the filesystem.
/// - An existing vendored install skips the download but still runs the
///   alias repair pass.
/// - Otherwise the platform archive is downloaded and installed under the
///   advisory install lock, re-checking for a concurrently finished install
///   after the lock is acquired.
pub fn ensure_installed(
    locator: &Locator<'_>,
    progress: Option<ProgressFn>,
) -> Result<bool, InstallError> {
    let layout = locator.layout();

    match locator.resolve() {
        Some(location) if location.origin == EngineOrigin::System => return Ok(true),
        Some(_) => {
            repair_aliases(&layout.bin_dir())?;
            return Ok(true);
        }
        None => {}
    }

    let _guard = acquire_lock(&layout.lock_path(), LOCK_TIMEOUT, "install LaTeX distribution")?;

    // Another process may have finished the install while we waited.
    if vendored_present(layout) {
        repair_aliases(&layout.bin_dir())?;
        return Ok(true);
    }

    install_from(layout, dist_url(detect_os()), progress)?;
    Ok(true)
}

/// Downloads and installs the distribution archive at `url` into the layout
/// root. The install marker is written only after extraction and repair
/// both succeed; on failure the staged download is cleaned up and the
/// marker stays absent, so a later run re-installs instead of trusting a
/// partial tree.
pub fn install_from(
    layout: &InstallLayout,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<(), InstallError> {
    let kind = ArchiveKind::from_name(url).ok_or_else(|| InstallError::ExtractionFailed {
        archive_kind: "unknown",
        reason: format!("cannot determine archive format from '{}'", url),
    })?;

    fs::create_dir_all(&layout.root).map_err(|e| InstallError::Io {
        operation: format!("create install root {}", layout.root.display()),
        source: e,
    })?;

    let archive = download_to_temp(url, &layout.root, progress)?;
    extract_archive(archive.path(), &layout.root, kind)?;
    // Staged archive removed here.
    drop(archive);

    repair_aliases(&layout.bin_dir())?;

    fs::write(layout.marker_path(), b"installed by tex2pdf\n").map_err(|e| InstallError::Io {
        operation: format!("write install marker {}", layout.marker_path().display()),
        source: e,
    })?;

    Ok(())
}

/// Streams `url` into a uniquely named temporary file inside `dest_dir`.
///
/// The returned handle deletes the file on drop, which doubles as cleanup
/// on any later failure. Redirects are followed up to the client's hop cap;
/// exceeding it is a distinct error.
fn download_to_temp(
    url: &str,
    dest_dir: &Path,
    progress: Option<ProgressFn>,
) -> Result<tempfile::NamedTempFile, InstallError> {
    let client =
        http::build_client(http::DOWNLOAD_TIMEOUT).map_err(|e| InstallError::DownloadFailed {
            url: url.to_string(),
            source: e,
        })?;

    let mut response = client.get(url).send().map_err(|e| {
        if e.is_redirect() {
            InstallError::TooManyRedirects {
                url: url.to_string(),
                limit: http::MAX_REDIRECTS,
            }
        } else {
            InstallError::DownloadFailed {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(InstallError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let total = response.content_length();

    let mut temp_file =
        tempfile::NamedTempFile::new_in(dest_dir).map_err(|e| InstallError::Io {
            operation: format!("create staging file in {}", dest_dir.display()),
            source: e,
        })?;

    let mut buffer = [0u8; 8192];
    let mut downloaded: u64 = 0;
    let mut last_decile: u64 = 0;

    loop {
        let bytes_read = response.read(&mut buffer).map_err(|e| InstallError::Io {
            operation: "read from HTTP response".to_string(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        temp_file
            .write_all(&buffer[..bytes_read])
            .map_err(|e| InstallError::Io {
                operation: "write to staging file".to_string(),
                source: e,
            })?;

        downloaded += bytes_read as u64;

        // Progress only when the total is known, at 10% steps.
        if let Some(callback) = progress
            && let Some(total) = total
            && total > 0
        {
            let decile = downloaded * 10 / total;
            if decile > last_decile {
                last_decile = decile;
                callback(downloaded, total);
            }
        }
    }

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| InstallError::Io {
            operation: "sync staging file".to_string(),
            source: e,
        })?;

    Ok(temp_file)
}
