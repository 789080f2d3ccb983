//! Best-effort probing for a usable LaTeX installation.
//!
//! A system-wide installation on PATH is preferred; the vendored install is
//! the fallback. Probing is pure read-only filesystem inspection and is
//! recomputed on every call, so the result always reflects the disk.

use crate::engine::Engine;
use crate::layout::InstallLayout;
use crate::platform::{detect_os, exe_name};
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOrigin {
    System,
    Vendored,
}

impl fmt::Display for EngineOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOrigin::System => write!(f, "system PATH"),
            EngineOrigin::Vendored => write!(f, "vendored install"),
        }
    }
}

/// A directory that holds engine executables, plus where it came from.
#[derive(Debug, Clone)]
pub struct EngineLocation {
    pub bin_dir: PathBuf,
    pub origin: EngineOrigin,
}

/// Resolves LaTeX installations against an install layout and a search path.
///
/// The search path defaults to the process `PATH` but is injectable so the
/// system probe can be silenced deterministically in tests.
#[derive(Debug)]
pub struct Locator<'a> {
    layout: &'a InstallLayout,
    search_path: Option<OsString>,
}

impl<'a> Locator<'a> {
    pub fn new(layout: &'a InstallLayout) -> Self {
        Self {
            layout,
            search_path: env::var_os("PATH"),
        }
    }

    pub fn with_search_path(layout: &'a InstallLayout, search_path: Option<OsString>) -> Self {
        Self {
            layout,
            search_path,
        }
    }

    pub fn layout(&self) -> &InstallLayout {
        self.layout
    }

    /// Finds an engine directory: system PATH first, vendored install next.
    ///
    /// Every probe failure is treated as "not found", never as an error.
    pub fn resolve(&self) -> Option<EngineLocation> {
        if let Some(bin_dir) = self.resolve_system() {
            return Some(EngineLocation {
                bin_dir,
                origin: EngineOrigin::System,
            });
        }

        if vendored_present(self.layout) {
            return Some(EngineLocation {
                bin_dir: self.layout.bin_dir(),
                origin: EngineOrigin::Vendored,
            });
        }

        None
    }

    /// Full executable path for the requested engine, if any installation
    /// resolves.
    pub fn engine_executable_path(&self, engine: Engine) -> Option<PathBuf> {
        self.resolve()
            .map(|location| location.bin_dir.join(exe_name(engine.name(), detect_os())))
    }

    fn resolve_system(&self) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let executable = which::which_in(Engine::DEFAULT.name(), Some(paths), cwd).ok()?;
        executable.parent().map(Path::to_path_buf)
    }
}

/// Whether the vendored install exposes the probe engine and finished
/// installing (marker present).
pub fn vendored_present(layout: &InstallLayout) -> bool {
    let probe = layout
        .bin_dir()
        .join(exe_name(Engine::DEFAULT.name(), detect_os()));
    layout.marker_path().exists() && probe.exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{detect_os, exe_name};
    use std::fs;
    use tempfile::TempDir;

    fn no_system_locator(layout: &InstallLayout) -> Locator<'_> {
        Locator::with_search_path(layout, None)
    }

    /// Seeds a vendored install: probe engine binary plus the marker file.
    fn seed_vendored(layout: &InstallLayout) {
        let bin_dir = layout.bin_dir();
        fs::create_dir_all(&bin_dir).unwrap();
        let probe = bin_dir.join(exe_name("pdflatex", detect_os()));
        fs::write(&probe, b"fake engine").unwrap();
        fs::write(layout.marker_path(), b"").unwrap();
    }

    #[test]
    fn test_resolve_nothing_installed() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());

        assert!(no_system_locator(&layout).resolve().is_none());
    }

    #[test]
    fn test_resolve_vendored() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        seed_vendored(&layout);

        let location = no_system_locator(&layout).resolve().expect("should resolve");
        assert_eq!(location.origin, EngineOrigin::Vendored);
        assert_eq!(location.bin_dir, layout.bin_dir());
    }

    #[test]
    fn test_vendored_requires_marker() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        seed_vendored(&layout);
        fs::remove_file(layout.marker_path()).unwrap();

        // Binary present but the install never completed: not usable.
        assert!(no_system_locator(&layout).resolve().is_none());
    }

    #[test]
    fn test_vendored_requires_probe_binary() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        fs::create_dir_all(layout.bin_dir()).unwrap();
        fs::write(layout.marker_path(), b"").unwrap();

        assert!(no_system_locator(&layout).resolve().is_none());
    }

    #[test]
    fn test_engine_executable_path_appends_engine_name() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        seed_vendored(&layout);

        let locator = no_system_locator(&layout);
        let path = locator
            .engine_executable_path(Engine::Xelatex)
            .expect("should resolve");
        assert_eq!(
            path,
            layout.bin_dir().join(exe_name("xelatex", detect_os()))
        );
    }

    #[test]
    fn test_engine_executable_path_none_without_install() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());

        let locator = no_system_locator(&layout);
        assert!(locator.engine_executable_path(Engine::Pdflatex).is_none());
    }

    #[test]
    fn test_system_probe_with_empty_search_path() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());

        let locator = Locator::with_search_path(&layout, Some(OsString::new()));
        assert!(locator.resolve().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_probe_finds_engine_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path().join("vendored"));

        let path_dir = temp.path().join("fakebin");
        fs::create_dir_all(&path_dir).unwrap();
        let engine = path_dir.join("pdflatex");
        fs::write(&engine, "#!/bin/sh\nexit 0\n").unwrap();
        let mut perms = fs::metadata(&engine).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&engine, perms).unwrap();

        let locator =
            Locator::with_search_path(&layout, Some(path_dir.clone().into_os_string()));
        let location = locator.resolve().expect("should find system engine");
        assert_eq!(location.origin, EngineOrigin::System);
        assert_eq!(location.bin_dir, path_dir);
    }
}
