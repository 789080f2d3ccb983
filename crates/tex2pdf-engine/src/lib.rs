//! LaTeX engine location, provisioning and invocation for tex2pdf.
//!
//! This crate does the actual work behind the `tex2pdf` command:
//!
//! - [`locate`]: find a usable LaTeX installation (system PATH first, then
//!   the vendored install directory)
//! - [`install`]: download the platform distribution archive, extract it
//!   into the vendored install root and repair the engine aliases
//! - [`convert`]: invoke a resolved engine against a TeX document and stream
//!   the produced PDF into the output file, with a single font-related
//!   fallback from the default engine
//!
//! # Engine resolution flow
//!
//! ```text
//! Locator::resolve()
//!     ↓
//! 1. Probe PATH for pdflatex (which-style lookup)
//!     ↓ (not found)
//! 2. Probe the vendored install root
//!     → {root}/bin/{platform}/pdflatex + install marker
//!     ↓ (not found)
//! 3. None
//! ```
//!
//! The vendored install root is an explicitly injected [`InstallLayout`]
//! value, never a hidden global path. Installation writes a marker file only
//! after the archive has been fully extracted and repaired, so a partially
//! extracted tree is never mistaken for a finished install, and the whole
//! install sequence runs under an advisory file lock so concurrent first
//! runs cannot race on the same directory.

// Core modules
pub mod convert;
pub mod engine;
pub mod install;
pub mod layout;
pub mod locate;
pub mod platform;

mod http;

// Re-export commonly used types
pub use convert::{ConversionRequest, convert};
pub use engine::Engine;
pub use install::{InstallError, ensure_installed, install_from};
pub use layout::InstallLayout;
pub use locate::{EngineLocation, EngineOrigin, Locator};

// Type alias for convenience
pub type Result<T> = tex2pdf_core::Result<T>;
