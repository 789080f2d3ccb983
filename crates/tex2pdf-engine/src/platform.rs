//! Platform detection and the fixed per-platform install constants.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOs,
    Linux,
    Windows,
}

/// Detects the OS family at compile time.
///
/// Non-Linux Unix systems use the Linux distribution layout, so the mapping
/// is total and infallible.
pub fn detect_os() -> Os {
    #[cfg(target_os = "windows")]
    return Os::Windows;

    #[cfg(target_os = "macos")]
    return Os::MacOs;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    Os::Linux
}

/// Platform subdirectory under the vendored install's `bin/` directory.
pub fn bin_subdir(os: Os) -> &'static str {
    match os {
        Os::Windows => "windows",
        Os::MacOs => "universal-darwin",
        Os::Linux => "x86_64-linux",
    }
}

/// Executable file name for a binary base name on the given platform.
pub fn exe_name(base: &str, os: Os) -> String {
    match os {
        Os::Windows => format!("{}.exe", base),
        _ => base.to_string(),
    }
}

/// TinyTeX distribution archive for macOS/Linux (gzipped tarball).
pub const DIST_URL_UNIX: &str =
    "https://github.com/rstudio/tinytex-releases/releases/download/daily/TinyTeX-1.tar.gz";

/// TinyTeX distribution archive for Windows (zip).
pub const DIST_URL_WINDOWS: &str =
    "https://github.com/rstudio/tinytex-releases/releases/download/daily/TinyTeX-1.zip";

/// Distribution archive URL for the given platform.
pub fn dist_url(os: Os) -> &'static str {
    match os {
        Os::Windows => DIST_URL_WINDOWS,
        Os::MacOs | Os::Linux => DIST_URL_UNIX,
    }
}
