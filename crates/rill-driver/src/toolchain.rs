//! Backend toolchain adapter: compile and link through the native C++
//! compiler.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// A backend invocation failed.
#[derive(Error, Debug)]
pub enum ToolchainError {
    /// The compiler binary could not be started.
    #[error("failed to invoke {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The compiler ran and reported errors (non-zero exit).
    #[error("{tool} failed:\n{diagnostics}")]
    Failed { tool: String, diagnostics: String },
}

/// The two operations the driver needs from the backend.
///
/// A single failure is fatal to the enclosing pipeline run; there are no
/// retries.
pub trait Toolchain {
    /// Compile one source file to one object file.
    fn compile_object(
        &self,
        source: &Path,
        object: &Path,
        include_dirs: &[PathBuf],
    ) -> Result<(), ToolchainError>;

    /// Link object files and/or raw source files into one executable.
    fn link(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        include_dirs: &[PathBuf],
    ) -> Result<(), ToolchainError>;
}

/// GCC-compatible toolchain (`g++` by default).
pub struct GnuToolchain {
    compiler: String,
    std_flag: &'static str,
}

impl GnuToolchain {
    pub fn new(compiler: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            std_flag: "-std=c++11",
        }
    }

    fn command(&self, include_dirs: &[PathBuf]) -> Command {
        let mut cmd = Command::new(&self.compiler);
        cmd.arg(self.std_flag);
        cmd.args(include_args(include_dirs));
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<(), ToolchainError> {
        let output = cmd.output().map_err(|e| ToolchainError::Spawn {
            tool: self.compiler.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(ToolchainError::Failed {
                tool: self.compiler.clone(),
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

impl Default for GnuToolchain {
    fn default() -> Self {
        Self::new("g++")
    }
}

impl Toolchain for GnuToolchain {
    fn compile_object(
        &self,
        source: &Path,
        object: &Path,
        include_dirs: &[PathBuf],
    ) -> Result<(), ToolchainError> {
        let mut cmd = self.command(include_dirs);
        cmd.arg("-c").arg(source).arg("-o").arg(object);
        self.run(cmd)
    }

    fn link(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        include_dirs: &[PathBuf],
    ) -> Result<(), ToolchainError> {
        let mut cmd = self.command(include_dirs);
        cmd.args(inputs).arg("-o").arg(output);
        self.run(cmd)
    }
}

/// `-I<dir>` arguments for a list of include directories.
fn include_args(include_dirs: &[PathBuf]) -> Vec<String> {
    include_dirs
        .iter()
        .map(|dir| format!("-I{}", dir.display()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_args_prefix_each_dir() {
        let dirs = vec![PathBuf::from("/proj/build"), PathBuf::from("/proj")];
        assert_eq!(include_args(&dirs), vec!["-I/proj/build", "-I/proj"]);
    }
}
