//! # Rill AST
//!
//! The decoded shape of the frontend's `--json-ast` output.
//!
//! The driver treats the AST as opaque apart from one thing: the ordered
//! statement list, where a statement may declare an import of another
//! module. Everything else the frontend emits is retained verbatim so the
//! decode round-trips future frontend additions without a driver change.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A parsed Rill module as returned by the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    /// Top-level statements in source order.
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// One top-level statement.
///
/// Only the `Import` field is interpreted; all other fields are kept as
/// raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct Statement {
    #[serde(rename = "Import")]
    pub import: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Program {
    /// Relative paths of the modules this program imports, in declaration
    /// order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.statements
            .iter()
            .filter_map(|stmt| stmt.import.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_imports_in_order() {
        let program: Program = serde_json::from_str(
            r#"{
                "statements": [
                    {"Import": "util.rl"},
                    {"FnDecl": {"name": "main"}},
                    {"Import": "math.rl"}
                ]
            }"#,
        )
        .unwrap();

        let imports: Vec<&str> = program.imports().collect();
        assert_eq!(imports, vec!["util.rl", "math.rl"]);
    }

    #[test]
    fn tolerates_unknown_statement_fields() {
        let program: Program = serde_json::from_str(
            r#"{"statements": [{"Expr": {"call": "print"}, "span": [0, 10]}]}"#,
        )
        .unwrap();

        assert_eq!(program.statements.len(), 1);
        assert!(program.statements[0].import.is_none());
        assert!(program.statements[0].fields.contains_key("span"));
    }

    #[test]
    fn empty_program_decodes() {
        let program: Program = serde_json::from_str("{}").unwrap();
        assert_eq!(program.imports().count(), 0);
    }
}
