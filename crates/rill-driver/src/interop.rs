//! Native-interop scanning.
//!
//! A hand-written C++ file can include generated Rill headers. Scanning
//! its include directives yields the Rill modules to seed resolution
//! with, instead of a single entry module.

use std::path::{Path, PathBuf};

use crate::context::BuildContext;

/// Extract the stems of local quoted includes ending in `.{header_ext}`.
///
/// Only the `#include "name.hpp"` form matches; system includes and other
/// extensions are skipped.
pub fn scan_includes(source: &str, header_ext: &str) -> Vec<String> {
    let suffix = format!(".{}", header_ext);
    let mut stems = Vec::new();

    for line in source.lines() {
        let Some(rest) = line.trim_start().strip_prefix("#include") else {
            continue;
        };
        let rest = rest.trim_start();

        let Some(quoted) = rest.strip_prefix('"') else {
            continue;
        };
        let Some(end) = quoted.find('"') else {
            continue;
        };

        if let Some(stem) = quoted[..end].strip_suffix(&suffix) {
            if !stem.is_empty() {
                stems.push(stem.to_string());
            }
        }
    }

    stems
}

/// Seed modules for an interop build: included headers whose `.rl` source
/// exists alongside the native file.
///
/// Includes with no matching source module are silently skipped — the
/// native file may include generated headers from elsewhere or plain C++
/// headers that merely share the extension.
pub fn resolve_seeds(native: &Path, source: &str, ctx: &BuildContext) -> Vec<PathBuf> {
    let Some(dir) = native.parent() else {
        return Vec::new();
    };

    scan_includes(source, ctx.header_ext())
        .into_iter()
        .filter_map(|stem| {
            let candidate = dir.join(format!("{}.{}", stem, ctx.source_ext()));
            candidate.is_file().then_some(candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn matches_only_local_quoted_header_includes() {
        let source = r#"
            #include <iostream>
            #include "foo.hpp"
            #include   "nested/bar.hpp"
            #include "plain.h"
            #include "baz.cpp"
            int main() { return 0; }
        "#;

        assert_eq!(scan_includes(source, "hpp"), vec!["foo", "nested/bar"]);
    }

    #[test]
    fn ignores_malformed_directives() {
        let source = "#include \"unterminated.hpp\n#include\n// #include \"commented.hpp\"";
        assert!(scan_includes(source, "hpp").is_empty());
    }

    #[test]
    fn seeds_only_includes_with_source_alongside() {
        let dir = std::env::temp_dir().join("rill_test_interop_seeds");
        let _ = fs::create_dir_all(&dir);
        fs::write(dir.join("foo.rl"), "").unwrap();

        let native = dir.join("app.cpp");
        let source = "#include \"foo.hpp\"\n#include \"bar.hpp\"\n";
        let ctx = BuildContext::new(dir.clone(), dir.join("build"));

        let seeds = resolve_seeds(&native, source, &ctx);
        assert_eq!(seeds, vec![dir.join("foo.rl")]);

        let _ = fs::remove_dir_all(&dir);
    }
}
