//! Module records: one resolved source unit and its staged artifacts.

use std::path::{Path, PathBuf};

use rill_ast::Program;

use crate::context::BuildContext;
use crate::error::DriverError;

/// A resolved Rill module.
///
/// Identity is the canonical source path. The three staged paths are
/// derived once from the short name and the build context; nothing is
/// written until the generate and compile phases run.
#[derive(Debug, Clone)]
pub struct Module {
    source_path: PathBuf,
    name: String,
    program: Program,
    gen_source_path: PathBuf,
    header_path: PathBuf,
    object_path: PathBuf,
}

impl Module {
    /// Build a record for a parsed module.
    ///
    /// The short name is the source file stem; a path without one is
    /// rejected. Two modules with the same stem silently share staged
    /// paths (see DESIGN.md).
    pub fn derive(
        ctx: &BuildContext,
        source_path: PathBuf,
        program: Program,
    ) -> Result<Self, DriverError> {
        let name = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| DriverError::InvalidModuleName {
                path: source_path.clone(),
            })?;

        let gen_source_path = ctx.staged_source(&name);
        let header_path = ctx.staged_header(&name);
        let object_path = ctx.staged_object(&name);

        Ok(Self {
            source_path,
            name,
            program,
            gen_source_path,
            header_path,
            object_path,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Staged generated implementation (`.cpp`) path.
    pub fn gen_source_path(&self) -> &Path {
        &self.gen_source_path
    }

    /// Staged generated header (`.hpp`) path.
    pub fn header_path(&self) -> &Path {
        &self.header_path
    }

    /// Staged object (`.o`) path.
    pub fn object_path(&self) -> &Path {
        &self.object_path
    }

    /// Relative import paths declared by this module, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.program.imports()
    }
}
