use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use rill_driver::error::render_chain;
use rill_driver::{BuildContext, DriverError, GnuToolchain, Harness, Pipeline, ProcessRunner};
use rill_frontend::CoreBinary;

#[derive(Parser)]
#[command(
    name = "rill",
    version = "0.1.0",
    about = "Build driver for the Rill transpiling language",
    long_about = "Orchestrates the Rill frontend and the native C++ toolchain:\nresolves imports, stages generated C++, and builds executables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Rill (.rl) or C++ interop (.cpp) entry to an executable
    Build {
        /// Entry file
        input: PathBuf,

        /// Output executable path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Generate C++ for a Rill file and its imports without compiling
    Parse {
        /// Input Rill file
        input: PathBuf,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Compile a Rill file and its imports to object files
    Lib {
        /// Input Rill file
        input: PathBuf,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Build and run every Rill program under a test root
    Test {
        /// Directory to discover tests in
        #[arg(default_value = "tests")]
        root: PathBuf,

        #[command(flatten)]
        opts: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Build directory for staged artifacts
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Path to the rill-core frontend binary
    #[arg(long)]
    frontend: Option<PathBuf>,

    /// Native C++ compiler to invoke
    #[arg(long, default_value = "g++")]
    backend: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            opts,
        } => build_command(input, output, &opts),
        Commands::Parse { input, opts } => parse_command(input, &opts),
        Commands::Lib { input, opts } => lib_command(input, &opts),
        Commands::Test { root, opts } => test_command(root, &opts),
    }
}

/// Everything a pipeline run needs: context plus the two oracles.
struct Session {
    ctx: BuildContext,
    frontend: CoreBinary,
    toolchain: GnuToolchain,
}

fn open_session(opts: &CommonOpts) -> io::Result<Session> {
    let project_root = std::env::current_dir()?;
    let build_root = if opts.build_dir.is_absolute() {
        opts.build_dir.clone()
    } else {
        project_root.join(&opts.build_dir)
    };

    let ctx = BuildContext::new(project_root.clone(), build_root);
    ctx.ensure_build_root()?;

    let frontend = match &opts.frontend {
        Some(path) => CoreBinary::new(path.clone()),
        None => CoreBinary::discover(&project_root),
    };

    Ok(Session {
        ctx,
        frontend,
        toolchain: GnuToolchain::new(opts.backend.clone()),
    })
}

fn build_command(input: PathBuf, output: Option<PathBuf>, opts: &CommonOpts) -> ExitCode {
    let Some(input) = resolve_input(&input) else {
        return ExitCode::FAILURE;
    };
    let session = match open_session(opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error preparing build directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let output = output.unwrap_or_else(|| session.ctx.executable_path(&stem));

    let pipeline = Pipeline::new(&session.ctx, &session.frontend, &session.toolchain)
        .verbose(opts.verbose);

    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
    let result = if ext == session.ctx.gen_source_ext() {
        if opts.verbose {
            println!("Starting interop build for: {}", input.display());
        }
        pipeline.build_interop(&input, &output)
    } else if ext == session.ctx.source_ext() {
        if opts.verbose {
            println!("Starting build for entry point: {}", input.display());
        }
        pipeline.build(&input, &output)
    } else {
        eprintln!(
            "Error: expected a .{} or .{} entry file, got: {}",
            session.ctx.source_ext(),
            session.ctx.gen_source_ext(),
            input.display()
        );
        return ExitCode::FAILURE;
    };

    match result {
        Ok(exe) => {
            println!("Executable written to: {}", exe.display());
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

fn parse_command(input: PathBuf, opts: &CommonOpts) -> ExitCode {
    let Some(input) = resolve_input(&input) else {
        return ExitCode::FAILURE;
    };
    let session = match open_session(opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error preparing build directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::new(&session.ctx, &session.frontend, &session.toolchain)
        .verbose(opts.verbose);

    match pipeline.parse_only(&input) {
        Ok(build_root) => {
            println!("Generated C++ written to: {}", build_root.display());
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

fn lib_command(input: PathBuf, opts: &CommonOpts) -> ExitCode {
    let Some(input) = resolve_input(&input) else {
        return ExitCode::FAILURE;
    };
    let session = match open_session(opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error preparing build directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::new(&session.ctx, &session.frontend, &session.toolchain)
        .verbose(opts.verbose);

    match pipeline.build_library(&input) {
        Ok(objects) => {
            println!(
                "{} object files written to: {}",
                objects.len(),
                session.ctx.build_root().display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

fn test_command(root: PathBuf, opts: &CommonOpts) -> ExitCode {
    if !root.is_dir() {
        println!("No test directory found: {}", root.display());
        return ExitCode::SUCCESS;
    }

    let session = match open_session(opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error preparing build directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runner = ProcessRunner;
    let harness = Harness::new(&session.ctx, &session.frontend, &session.toolchain, &runner);

    let report = match harness.run_suite(&root) {
        Ok(report) => report,
        Err(e) => return report_failure(&e),
    };

    println!("\n--- Test Summary ---");
    println!("Passed: {}", report.passed());
    println!("Failed: {}", report.failed());

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// Helper functions

fn resolve_input(input: &PathBuf) -> Option<PathBuf> {
    match input.canonicalize() {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("Error resolving input path {}: {}", input.display(), e);
            None
        }
    }
}

fn report_failure(e: &DriverError) -> ExitCode {
    eprintln!("Error: {}", render_chain(e));
    ExitCode::FAILURE
}
