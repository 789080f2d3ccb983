// Core modules
pub mod error;
pub mod lock;

// Re-export commonly used types
pub use error::{Result, Tex2PdfError};
