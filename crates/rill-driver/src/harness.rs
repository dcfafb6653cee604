//! Test harness: build and run every Rill program under a test root.
//!
//! Each discovered `.rl` file is an independent whole-program build with
//! its own fresh build unit; the build directory is shared across units.
//! A unit's failure never aborts the others — the suite always runs to
//! the end and reports the aggregate.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use rill_frontend::Frontend;

use crate::context::BuildContext;
use crate::error::{render_chain, DriverError};
use crate::pipeline::Pipeline;
use crate::toolchain::Toolchain;

/// The pipeline stage at which a test unit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedPhase {
    Resolve,
    Generate,
    Compile,
    Run,
}

impl fmt::Display for FailedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailedPhase::Resolve => "module analysis",
            FailedPhase::Generate => "code generation",
            FailedPhase::Compile => "compile/link",
            FailedPhase::Run => "execution",
        };
        f.write_str(label)
    }
}

/// Result of one test unit.
#[derive(Debug)]
pub enum UnitOutcome {
    Passed,
    Failed { phase: FailedPhase, message: String },
}

/// Aggregate of a harness run.
#[derive(Debug, Default)]
pub struct TestReport {
    pub outcomes: Vec<(PathBuf, UnitOutcome)>,
}

impl TestReport {
    pub fn passed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, UnitOutcome::Passed))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Executes a built test program and captures its output.
///
/// Split out as a capability (like the frontend and backend oracles) so
/// harness aggregation is testable without producing real executables.
pub trait Runner {
    fn run(&self, program: &Path) -> io::Result<RunOutput>;
}

#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
}

/// Runs the program as a child process with no arguments.
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, program: &Path) -> io::Result<RunOutput> {
        let output = Command::new(program).output()?;
        Ok(RunOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

pub struct Harness<'a, F, T, R> {
    ctx: &'a BuildContext,
    frontend: &'a F,
    toolchain: &'a T,
    runner: &'a R,
}

impl<'a, F: Frontend, T: Toolchain, R: Runner> Harness<'a, F, T, R> {
    pub fn new(ctx: &'a BuildContext, frontend: &'a F, toolchain: &'a T, runner: &'a R) -> Self {
        Self {
            ctx,
            frontend,
            toolchain,
            runner,
        }
    }

    /// Build and run every `.rl` file under `root`, printing per-unit
    /// progress and returning the aggregate report.
    pub fn run_suite(&self, root: &Path) -> Result<TestReport, DriverError> {
        let mut files = Vec::new();
        collect_sources(root, self.ctx.source_ext(), &mut files).map_err(|e| DriverError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;
        files.sort();

        self.ctx.ensure_build_root().map_err(|e| DriverError::Io {
            path: self.ctx.build_root().to_path_buf(),
            source: e,
        })?;

        let mut report = TestReport::default();

        for file in files {
            println!("--- Running: {} ---", file.display());
            let outcome = self.run_unit(&file);

            match &outcome {
                UnitOutcome::Passed => println!("PASSED"),
                UnitOutcome::Failed { phase, message } => {
                    eprintln!("{}", message);
                    println!("FAILED ({})", phase);
                }
            }

            report.outcomes.push((file, outcome));
        }

        Ok(report)
    }

    /// One unit: fresh build unit, whole-program build into the build
    /// directory, then execute with no arguments.
    fn run_unit(&self, file: &Path) -> UnitOutcome {
        let stem = match file.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem,
            None => {
                return UnitOutcome::Failed {
                    phase: FailedPhase::Resolve,
                    message: format!("cannot derive a test name from {}", file.display()),
                }
            }
        };
        let exe = self.ctx.build_root().join(stem);

        let pipeline = Pipeline::new(self.ctx, self.frontend, self.toolchain);
        if let Err(e) = pipeline.build(file, &exe) {
            return UnitOutcome::Failed {
                phase: failed_phase(&e),
                message: render_chain(&e),
            };
        }

        match self.runner.run(&exe) {
            Ok(output) if output.success => {
                let text = output.stdout.trim_end();
                if !text.is_empty() {
                    println!("{}", text);
                }
                UnitOutcome::Passed
            }
            Ok(_) => UnitOutcome::Failed {
                phase: FailedPhase::Run,
                message: format!("{} exited with failure", exe.display()),
            },
            Err(e) => UnitOutcome::Failed {
                phase: FailedPhase::Run,
                message: format!("failed to execute {}: {}", exe.display(), e),
            },
        }
    }
}

/// Map a pipeline error to the harness phase it belongs to.
fn failed_phase(err: &DriverError) -> FailedPhase {
    match err {
        DriverError::Parse { .. }
        | DriverError::ImportNotFound { .. }
        | DriverError::InvalidModuleName { .. } => FailedPhase::Resolve,
        DriverError::Generation { .. } | DriverError::Io { .. } => FailedPhase::Generate,
        DriverError::Compile { .. } | DriverError::Link { .. } => FailedPhase::Compile,
    }
}

/// Recursively collect files with the given extension, depth-first.
fn collect_sources(dir: &Path, ext: &str, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(&path, ext, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(ext) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_frontend::FrontendError;

    #[test]
    fn failed_phase_follows_error_variant() {
        let parse = DriverError::Parse {
            path: PathBuf::from("a.rl"),
            source: FrontendError::Rejected {
                path: PathBuf::from("a.rl"),
                diagnostics: String::new(),
            },
        };
        assert_eq!(failed_phase(&parse), FailedPhase::Resolve);

        let link = DriverError::Link {
            output: PathBuf::from("a"),
            source: crate::toolchain::ToolchainError::Failed {
                tool: "g++".to_string(),
                diagnostics: String::new(),
            },
        };
        assert_eq!(failed_phase(&link), FailedPhase::Compile);
    }

    #[test]
    fn report_counts() {
        let mut report = TestReport::default();
        report.outcomes.push((PathBuf::from("a.rl"), UnitOutcome::Passed));
        report.outcomes.push((
            PathBuf::from("b.rl"),
            UnitOutcome::Failed {
                phase: FailedPhase::Compile,
                message: String::new(),
            },
        ));

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn collects_sources_recursively() {
        let dir = std::env::temp_dir().join("rill_test_collect_sources");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.rl"), "").unwrap();
        fs::write(dir.join("nested/b.rl"), "").unwrap();
        fs::write(dir.join("readme.md"), "").unwrap();

        let mut files = Vec::new();
        collect_sources(&dir, "rl", &mut files).unwrap();
        files.sort();

        assert_eq!(files, vec![dir.join("a.rl"), dir.join("nested/b.rl")]);

        let _ = fs::remove_dir_all(&dir);
    }
}
