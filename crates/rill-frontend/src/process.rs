//! Process-backed frontend: invokes the `rill-core` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rill_ast::Program;

use crate::{Frontend, FrontendError, GenMode};

/// The `rill-core` frontend binary.
pub struct CoreBinary {
    binary: PathBuf,
}

impl CoreBinary {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Find the frontend binary, searching common locations.
    ///
    /// Checks the `RILL_CORE` environment variable, then the release build
    /// under the project root, then falls back to `rill-core` on PATH.
    pub fn discover(project_root: &Path) -> Self {
        if let Ok(env_path) = std::env::var("RILL_CORE") {
            let p = PathBuf::from(env_path);
            if p.exists() {
                return Self::new(p);
            }
        }

        let local = project_root.join("rill-core/target/release/rill-core");
        if local.exists() {
            return Self::new(local);
        }

        Self::new(PathBuf::from("rill-core"))
    }

    pub fn path(&self) -> &Path {
        &self.binary
    }

    fn invoke(&self, source: &Path, args: &[&str]) -> Result<Output, FrontendError> {
        let output = Command::new(&self.binary).arg(source).args(args).output()?;

        if !output.status.success() {
            return Err(FrontendError::Rejected {
                path: source.to_path_buf(),
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output)
    }
}

impl Frontend for CoreBinary {
    fn parse(&self, source: &Path) -> Result<Program, FrontendError> {
        let output = self.invoke(source, &["--json-ast"])?;

        serde_json::from_slice(&output.stdout).map_err(|e| FrontendError::Malformed {
            path: source.to_path_buf(),
            source: e,
        })
    }

    fn generate(&self, source: &Path, mode: GenMode) -> Result<String, FrontendError> {
        let output = self.invoke(source, &["--gen", mode.flag()])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
