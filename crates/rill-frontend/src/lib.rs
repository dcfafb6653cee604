//! # Rill Frontend Gateway
//!
//! A narrow capability interface over the Rill frontend. The frontend is
//! an external binary (`rill-core`) that either parses a module to a JSON
//! AST or emits generated C++ text for it; this crate wraps both
//! invocations behind the [`Frontend`] trait so the driver can be tested
//! against in-memory implementations.

pub mod error;
pub mod process;

use std::fmt;
use std::path::Path;

use rill_ast::Program;

pub use error::FrontendError;
pub use process::CoreBinary;

/// Which of the two generated forms to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenMode {
    /// The C++ header form (`--gen hpp`).
    Header,
    /// The C++ implementation form (`--gen cpp`).
    Source,
}

impl GenMode {
    /// The argument value the frontend binary expects.
    pub fn flag(self) -> &'static str {
        match self {
            GenMode::Header => "hpp",
            GenMode::Source => "cpp",
        }
    }
}

impl fmt::Display for GenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// The two operations the driver needs from the frontend.
pub trait Frontend {
    /// Parse a module and return its decoded AST.
    fn parse(&self, source: &Path) -> Result<Program, FrontendError>;

    /// Produce generated C++ text for a module in the requested form.
    fn generate(&self, source: &Path, mode: GenMode) -> Result<String, FrontendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_mode_flags() {
        assert_eq!(GenMode::Header.flag(), "hpp");
        assert_eq!(GenMode::Source.flag(), "cpp");
        assert_eq!(GenMode::Source.to_string(), "cpp");
    }
}
