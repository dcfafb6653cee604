//! The build pipeline: resolve → generate → compile/link, per mode.
//!
//! All modes share the resolve and generate phases and diverge only at
//! the backend phase. Each phase runs to completion for the whole build
//! unit before the next starts, and the first failure halts the run.

use std::fs;
use std::path::{Path, PathBuf};

use rill_frontend::Frontend;

use crate::context::BuildContext;
use crate::error::DriverError;
use crate::generate::generate_unit;
use crate::interop;
use crate::resolver::{BuildUnit, Resolver};
use crate::toolchain::Toolchain;

pub struct Pipeline<'a, F, T> {
    ctx: &'a BuildContext,
    frontend: &'a F,
    toolchain: &'a T,
    verbose: bool,
}

impl<'a, F: Frontend, T: Toolchain> Pipeline<'a, F, T> {
    pub fn new(ctx: &'a BuildContext, frontend: &'a F, toolchain: &'a T) -> Self {
        Self {
            ctx,
            frontend,
            toolchain,
            verbose: false,
        }
    }

    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Whole-program build: link every generated implementation file
    /// directly into one executable at `output`.
    pub fn build(&self, entry: &Path, output: &Path) -> Result<PathBuf, DriverError> {
        let unit = self.resolve_phase(&[entry.to_path_buf()])?;
        self.generate_phase(&unit)?;

        if self.verbose {
            println!("[Phase 3] Linking...");
        }

        let sources: Vec<PathBuf> = unit
            .modules()
            .map(|m| m.gen_source_path().to_path_buf())
            .collect();

        self.link(&sources, output)
    }

    /// Parse-only: stop after generation and report the staging location.
    pub fn parse_only(&self, entry: &Path) -> Result<PathBuf, DriverError> {
        let unit = self.resolve_phase(&[entry.to_path_buf()])?;
        self.generate_phase(&unit)?;
        Ok(self.ctx.build_root().to_path_buf())
    }

    /// Library emission: compile each resolved module to its staged
    /// object file; no link step.
    pub fn build_library(&self, entry: &Path) -> Result<Vec<PathBuf>, DriverError> {
        let unit = self.resolve_phase(&[entry.to_path_buf()])?;
        self.generate_phase(&unit)?;
        self.compile_phase(&unit)
    }

    /// Native-interop build: seed resolution from the headers a
    /// hand-written C++ file includes, compile every resolved module to
    /// an object, then link the native file with all objects.
    pub fn build_interop(&self, native: &Path, output: &Path) -> Result<PathBuf, DriverError> {
        let text = fs::read_to_string(native).map_err(|e| DriverError::Io {
            path: native.to_path_buf(),
            source: e,
        })?;

        let seeds = interop::resolve_seeds(native, &text, self.ctx);
        if self.verbose {
            for seed in &seeds {
                println!("  Detected Rill dependency: {}", seed.display());
            }
        }

        let unit = self.resolve_phase(&seeds)?;
        self.generate_phase(&unit)?;
        let objects = self.compile_phase(&unit)?;

        if self.verbose {
            println!("[Phase 3] Linking...");
        }

        let mut inputs = vec![native.to_path_buf()];
        inputs.extend(objects);
        self.link(&inputs, output)
    }

    /// Resolve all seeds into one merged build unit.
    fn resolve_phase(&self, seeds: &[PathBuf]) -> Result<BuildUnit, DriverError> {
        if self.verbose {
            println!("[Phase 1] Resolving modules...");
        }

        let resolver = Resolver::new(self.frontend, self.ctx);
        let mut unit = BuildUnit::new();
        for seed in seeds {
            resolver.resolve(seed, &mut unit)?;
        }

        if self.verbose {
            println!("  Discovered {} modules", unit.len());
            for module in unit.modules() {
                println!("    {}", module.source_path().display());
            }
        }

        Ok(unit)
    }

    fn generate_phase(&self, unit: &BuildUnit) -> Result<(), DriverError> {
        if self.verbose {
            println!("[Phase 2] Generating C++...");
        }
        generate_unit(self.frontend, unit)
    }

    /// Compile every module in the unit to its staged object file.
    fn compile_phase(&self, unit: &BuildUnit) -> Result<Vec<PathBuf>, DriverError> {
        let include_dirs = self.ctx.include_dirs();
        let mut objects = Vec::new();

        for module in unit.modules() {
            if self.verbose {
                println!("  Compiling {}.o", module.name());
            }
            self.toolchain
                .compile_object(module.gen_source_path(), module.object_path(), &include_dirs)
                .map_err(|e| DriverError::Compile {
                    module: module.name().to_string(),
                    source: e,
                })?;
            objects.push(module.object_path().to_path_buf());
        }

        Ok(objects)
    }

    fn link(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf, DriverError> {
        self.toolchain
            .link(inputs, output, &self.ctx.include_dirs())
            .map_err(|e| DriverError::Link {
                output: output.to_path_buf(),
                source: e,
            })?;
        Ok(output.to_path_buf())
    }
}
