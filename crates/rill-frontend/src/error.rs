//! Frontend invocation failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a frontend invocation produced no usable result.
#[derive(Error, Debug)]
pub enum FrontendError {
    /// The frontend binary could not be started at all.
    #[error("failed to invoke frontend binary: {0}")]
    Spawn(#[from] io::Error),

    /// The frontend ran and rejected the module (non-zero exit).
    #[error("frontend rejected {}:\n{diagnostics}", path.display())]
    Rejected { path: PathBuf, diagnostics: String },

    /// The frontend exited cleanly but its output was not a valid AST.
    #[error("frontend produced malformed output for {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FrontendError {
    /// Captured stderr of the frontend, when the failure carries one.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            FrontendError::Rejected { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}
