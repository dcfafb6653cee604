//! Import-graph resolution.
//!
//! Walks the transitive import graph from one or more seed modules,
//! asking the frontend to parse each module exactly once per build unit.
//! The walk is an explicit worklist over canonical paths rather than call
//! recursion, so arbitrarily deep import chains cannot exhaust the stack.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use rill_frontend::Frontend;

use crate::context::BuildContext;
use crate::error::DriverError;
use crate::module::Module;

/// All modules resolved for one pipeline run, keyed by canonical source
/// path and iterable in discovery order.
///
/// A build unit never outlives its run; the test harness creates a fresh
/// one per discovered test file.
#[derive(Debug, Default)]
pub struct BuildUnit {
    modules: HashMap<PathBuf, Module>,
    order: Vec<PathBuf>,
}

impl BuildUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&Module> {
        self.modules.get(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Modules in the order they were discovered.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.order.iter().filter_map(|path| self.modules.get(path))
    }

    fn insert(&mut self, path: PathBuf, module: Module) {
        self.order.push(path.clone());
        self.modules.insert(path, module);
    }
}

/// Resolves entry modules and their transitive imports into a [`BuildUnit`].
pub struct Resolver<'a, F> {
    frontend: &'a F,
    ctx: &'a BuildContext,
}

impl<'a, F: Frontend> Resolver<'a, F> {
    pub fn new(frontend: &'a F, ctx: &'a BuildContext) -> Self {
        Self { frontend, ctx }
    }

    /// Resolve `entry` and everything it transitively imports into `unit`.
    ///
    /// A module already present in the unit is not parsed again; this is
    /// what makes a self-importing module (directly or through a longer
    /// chain) terminate: it is recorded before its imports are walked, so
    /// the walk finds it already resolved. Import paths are resolved
    /// relative to the importing file's directory; the first failure is
    /// returned as-is and the unit keeps the modules resolved so far.
    ///
    /// Returns the canonical path of the entry module.
    pub fn resolve(&self, entry: &Path, unit: &mut BuildUnit) -> Result<PathBuf, DriverError> {
        let entry = entry.canonicalize().map_err(|e| DriverError::Io {
            path: entry.to_path_buf(),
            source: e,
        })?;

        let mut worklist = VecDeque::new();
        worklist.push_back(entry.clone());

        while let Some(path) = worklist.pop_front() {
            if unit.contains(&path) {
                continue;
            }

            let program = self
                .frontend
                .parse(&path)
                .map_err(|e| DriverError::Parse {
                    path: path.clone(),
                    source: e,
                })?;

            let module = Module::derive(self.ctx, path.clone(), program)?;

            for import in module.imports() {
                worklist.push_back(self.resolve_import(import, &path)?);
            }

            unit.insert(path, module);
        }

        Ok(entry)
    }

    /// Turn a declared import into the canonical path of an existing file.
    fn resolve_import(&self, import: &str, importer: &Path) -> Result<PathBuf, DriverError> {
        let dir = importer.parent().unwrap_or_else(|| Path::new("."));
        let target = dir.join(import);

        if !target.is_file() {
            return Err(DriverError::ImportNotFound {
                import: import.to_string(),
                importer: importer.to_path_buf(),
            });
        }

        target.canonicalize().map_err(|e| DriverError::Io {
            path: target,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_ast::Program;

    fn dummy_module(ctx: &BuildContext, path: &str) -> (PathBuf, Module) {
        let path = PathBuf::from(path);
        let module =
            Module::derive(ctx, path.clone(), Program { statements: vec![] }).unwrap();
        (path, module)
    }

    #[test]
    fn unit_iterates_in_discovery_order() {
        let ctx = BuildContext::new(PathBuf::from("/p"), PathBuf::from("/p/build"));
        let mut unit = BuildUnit::new();

        for path in ["/p/main.rl", "/p/util.rl", "/p/math.rl"] {
            let (path, module) = dummy_module(&ctx, path);
            unit.insert(path, module);
        }

        let names: Vec<&str> = unit.modules().map(Module::name).collect();
        assert_eq!(names, vec!["main", "util", "math"]);
        assert_eq!(unit.len(), 3);
        assert!(unit.contains(Path::new("/p/util.rl")));
    }
}
