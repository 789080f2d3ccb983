use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Tex2PdfError {
    // Input errors
    #[error("INPUT_NOT_FOUND: input file '{0}' does not exist")]
    InputNotFound(PathBuf),

    // Engine errors
    #[error(
        "ENGINE_NOT_FOUND: no usable LaTeX installation exposes '{0}' (searched PATH and the vendored install)"
    )]
    EngineNotFound(String),

    #[error("ENGINE_EXEC_FAILED: {0}")]
    EngineExecFailed(String),

    // Install errors
    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(String),

    #[error("UNSUPPORTED_PLATFORM: {0}")]
    UnsupportedPlatform(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<crate::lock::LockError> for Tex2PdfError {
    fn from(err: crate::lock::LockError) -> Self {
        Tex2PdfError::InstallFailed(format!("lock error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Tex2PdfError>;
