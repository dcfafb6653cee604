//! Build context: where staged artifacts live and how they are named.

use std::io;
use std::path::{Path, PathBuf};

/// Staging conventions for one build invocation.
///
/// Every component takes the context explicitly; there is no global build
/// directory. Staged-artifact paths are always derived through here, which
/// keeps them inside the build root and keyed by module short name.
#[derive(Debug, Clone)]
pub struct BuildContext {
    project_root: PathBuf,
    build_root: PathBuf,
    source_ext: String,
    gen_source_ext: String,
    header_ext: String,
    object_ext: String,
}

impl BuildContext {
    /// Context with the standard Rill extensions (`rl`/`cpp`/`hpp`/`o`).
    pub fn new(project_root: PathBuf, build_root: PathBuf) -> Self {
        Self {
            project_root,
            build_root,
            source_ext: "rl".to_string(),
            gen_source_ext: "cpp".to_string(),
            header_ext: "hpp".to_string(),
            object_ext: "o".to_string(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn source_ext(&self) -> &str {
        &self.source_ext
    }

    pub fn gen_source_ext(&self) -> &str {
        &self.gen_source_ext
    }

    pub fn header_ext(&self) -> &str {
        &self.header_ext
    }

    /// Staged path of a module's generated implementation file.
    pub fn staged_source(&self, name: &str) -> PathBuf {
        self.build_root.join(format!("{}.{}", name, self.gen_source_ext))
    }

    /// Staged path of a module's generated header.
    pub fn staged_header(&self, name: &str) -> PathBuf {
        self.build_root.join(format!("{}.{}", name, self.header_ext))
    }

    /// Staged path of a module's compiled object file.
    pub fn staged_object(&self, name: &str) -> PathBuf {
        self.build_root.join(format!("{}.{}", name, self.object_ext))
    }

    /// Default location for a linked executable named after an entry stem.
    pub fn executable_path(&self, stem: &str) -> PathBuf {
        self.project_root.join(stem)
    }

    /// Include-search directories handed to every backend invocation:
    /// generated headers first, then hand-written headers in the project.
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        vec![self.build_root.clone(), self.project_root.clone()]
    }

    /// Create the build root if it does not exist yet.
    pub fn ensure_build_root(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.build_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_paths_live_under_build_root() {
        let ctx = BuildContext::new(PathBuf::from("/proj"), PathBuf::from("/proj/build"));

        assert_eq!(ctx.staged_source("util"), PathBuf::from("/proj/build/util.cpp"));
        assert_eq!(ctx.staged_header("util"), PathBuf::from("/proj/build/util.hpp"));
        assert_eq!(ctx.staged_object("util"), PathBuf::from("/proj/build/util.o"));
    }

    #[test]
    fn include_dirs_cover_build_and_project() {
        let ctx = BuildContext::new(PathBuf::from("/proj"), PathBuf::from("/proj/build"));
        let dirs = ctx.include_dirs();

        assert_eq!(dirs, vec![PathBuf::from("/proj/build"), PathBuf::from("/proj")]);
    }
}
