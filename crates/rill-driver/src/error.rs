//! Driver error taxonomy.
//!
//! Every failure is fatal to the enclosing pipeline run and propagates
//! unchanged with the originating module's identity attached; nothing is
//! retried and no partial result is reported as success.

use std::io;
use std::path::PathBuf;

use rill_frontend::{FrontendError, GenMode};
use thiserror::Error;

use crate::toolchain::ToolchainError;

#[derive(Error, Debug)]
pub enum DriverError {
    /// The frontend rejected a module during resolution.
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontendError,
    },

    /// The frontend rejected a generation request for a parsed module.
    #[error("failed to generate {mode} for module `{module}`")]
    Generation {
        module: String,
        mode: GenMode,
        #[source]
        source: FrontendError,
    },

    /// A declared import does not resolve to an existing file.
    #[error("import \"{import}\" declared in {} does not exist", importer.display())]
    ImportNotFound { import: String, importer: PathBuf },

    /// A module's source path yields no usable short name.
    #[error("cannot derive a module name from {}", path.display())]
    InvalidModuleName { path: PathBuf },

    /// The backend failed to compile one module to an object file.
    #[error("failed to compile module `{module}`")]
    Compile {
        module: String,
        #[source]
        source: ToolchainError,
    },

    /// The backend failed to link the final artifact.
    #[error("failed to link {}", output.display())]
    Link {
        output: PathBuf,
        #[source]
        source: ToolchainError,
    },

    /// A filesystem operation on a staged or input path failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Render an error with its cause chain, one cause per line.
pub fn render_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        text.push_str(&format!("\n  caused by: {}", c));
        cause = c.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_captured_diagnostics() {
        let err = DriverError::Parse {
            path: PathBuf::from("main.rl"),
            source: rill_frontend::FrontendError::Rejected {
                path: PathBuf::from("main.rl"),
                diagnostics: "unexpected token `}`".to_string(),
            },
        };

        let rendered = render_chain(&err);
        assert!(rendered.contains("failed to parse main.rl"));
        assert!(rendered.contains("unexpected token `}`"));
    }
}
