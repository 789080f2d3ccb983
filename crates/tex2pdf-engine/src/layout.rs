//! Filesystem layout of the vendored LaTeX install.
//!
//! The install root is an explicitly injected configuration value. Every
//! path the installer and locator touch is derived from it here, so tests
//! (and callers) can point the whole flow at any directory.

use crate::platform::{Os, bin_subdir, detect_os};
use std::path::PathBuf;

/// Sentinel file written only after a fully successful install.
///
/// Its absence means a previous install never completed, so a partially
/// extracted tree is re-installed instead of being trusted.
const INSTALL_MARKER: &str = ".tex2pdf-installed";

const INSTALL_LOCK: &str = "install.lock";

#[derive(Debug, Clone)]
pub struct InstallLayout {
    pub root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default install root under the OS cache directory.
    ///
    /// - macOS: `~/Library/Caches/tex2pdf/tinytex`
    /// - Linux: `~/.cache/tex2pdf/tinytex`
    /// - Windows: `%LOCALAPPDATA%\tex2pdf\tinytex`
    pub fn default_root() -> Option<PathBuf> {
        dirs::cache_dir().map(|base| base.join("tex2pdf").join("tinytex"))
    }

    /// Platform binary directory of the vendored install.
    pub fn bin_dir(&self) -> PathBuf {
        self.bin_dir_for(detect_os())
    }

    /// Binary directory for an explicit platform value.
    pub fn bin_dir_for(&self, os: Os) -> PathBuf {
        self.root.join("bin").join(bin_subdir(os))
    }

    pub fn marker_path(&self) -> PathBuf {
        self.root.join(INSTALL_MARKER)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(INSTALL_LOCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_bin_dir_for_all_platforms() {
        let layout = InstallLayout::new("/opt/tex");
        assert_eq!(
            layout.bin_dir_for(Os::Linux),
            Path::new("/opt/tex/bin/x86_64-linux")
        );
        assert_eq!(
            layout.bin_dir_for(Os::MacOs),
            Path::new("/opt/tex/bin/universal-darwin")
        );
        assert_eq!(
            layout.bin_dir_for(Os::Windows),
            Path::new("/opt/tex/bin/windows")
        );
    }

    #[test]
    fn test_marker_and_lock_live_in_root() {
        let layout = InstallLayout::new("/opt/tex");
        assert_eq!(layout.marker_path().parent().unwrap(), layout.root);
        assert_eq!(layout.lock_path().parent().unwrap(), layout.root);
        assert_ne!(layout.marker_path(), layout.lock_path());
    }

    #[test]
    fn test_default_root_ends_with_tool_subdirs() {
        if let Some(root) = InstallLayout::default_root() {
            assert!(root.ends_with("tex2pdf/tinytex") || root.ends_with("tex2pdf\\tinytex"));
        }
    }
}
