//! Parser collaborator
//!
//! The evaluator never parses source text itself. A [`SyntaxParser`]
//! produces the raw JSON tree (with integer kind codes) and the kind
//! table needed to normalize it:
//!
//! ```text
//! Source → [SyntaxParser] → raw tree → normalize → [Evaluate] → Value
//! ```
//!
//! [`ScriptParser`] is the stock implementation. It drives the TypeScript
//! compiler API through a JavaScript runtime child process.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value as Json;
use thiserror::Error;

use crate::error::EvalError;
use crate::kinds::KindTable;
use crate::normalize::normalize;

// ═══════════════════════════════════════════════════════════════════════
// ERROR TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised while obtaining a syntax tree.
#[derive(Error, Debug)]
pub enum ParserError {
    /// The parser process could not be started or talked to
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The parser process exited unsuccessfully
    #[error("parser exited with {status}: {stderr}")]
    Failed {
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The parser printed something that is not JSON
    #[error("parser output is not valid JSON: {0}")]
    Output(#[from] serde_json::Error),

    /// The kind dump or tree could not be turned into a normalized tree
    #[error(transparent)]
    Kinds(#[from] EvalError),
}

// ═══════════════════════════════════════════════════════════════════════
// PARSER TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Source of syntax trees.
pub trait SyntaxParser {
    /// The parser's kind code table.
    fn kind_table(&self) -> Result<KindTable, ParserError>;

    /// Parse `source` into a raw tree whose `kind` fields are codes.
    fn parse(&self, source: &str, filename: &str) -> Result<Json, ParserError>;

    /// Parse and normalize in one step.
    fn parse_normalized(&self, source: &str, filename: &str) -> Result<Json, ParserError> {
        let kinds = self.kind_table()?;
        let tree = self.parse(source, filename)?;
        Ok(normalize(&tree, &kinds)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCRIPT PARSER
// ═══════════════════════════════════════════════════════════════════════

/// Runs the TypeScript compiler API under a script runtime (`bun -e` by
/// default). Source text goes in on stdin; JSON comes out on stdout.
#[derive(Debug, Clone)]
pub struct ScriptParser {
    program: String,
    args: Vec<String>,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new("bun", ["-e"])
    }
}

impl ScriptParser {
    /// Use `program args... <script>` to run the parser script.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw `ts.SyntaxKind` enum dump.
    pub fn syntax_kinds(&self) -> Result<Json, ParserError> {
        self.run("ts.SyntaxKind", "")
    }

    /// Evaluate the JavaScript expression `expr` with `s` bound to `input`.
    fn run(&self, expr: &str, input: &str) -> Result<Json, ParserError> {
        let script = format!(
            "var ts=require('typescript'),s='';\
             for await(var c of process.stdin)s+=c;\
             console.log(JSON.stringify({}))",
            expr
        );
        let spawn_error = |source| ParserError::Spawn {
            program: self.program.clone(),
            source,
        };

        tracing::debug!(program = %self.program, expr, "running parser script");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).map_err(spawn_error)?;
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(ParserError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl SyntaxParser for ScriptParser {
    fn kind_table(&self) -> Result<KindTable, ParserError> {
        Ok(KindTable::from_enum_json(&self.syntax_kinds()?)?)
    }

    fn parse(&self, source: &str, filename: &str) -> Result<Json, ParserError> {
        let expr = format!(
            "ts.createSourceFile({},s,ts.ScriptTarget.Latest)",
            serde_json::to_string(filename)?
        );
        self.run(&expr, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedParser;

    impl SyntaxParser for FixedParser {
        fn kind_table(&self) -> Result<KindTable, ParserError> {
            Ok(KindTable::from_pairs([(1, "SourceFile"), (2, "TrueKeyword")]))
        }

        fn parse(&self, _source: &str, _filename: &str) -> Result<Json, ParserError> {
            Ok(json!({"kind": 1, "statements": [{"kind": 2}]}))
        }
    }

    #[test]
    fn test_parse_normalized_uses_kind_table() {
        let tree = FixedParser.parse_normalized("true", "a.ts").unwrap();
        assert_eq!(
            tree,
            json!({"kind": "SourceFile", "statements": [{"kind": "TrueKeyword"}]})
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let parser = ScriptParser::new("litfold-no-such-program", Vec::<String>::new());
        let err = parser.kind_table().unwrap_err();
        assert!(matches!(err, ParserError::Spawn { .. }));
        assert!(err.to_string().contains("litfold-no-such-program"));
    }
}
