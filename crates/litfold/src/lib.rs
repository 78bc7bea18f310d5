//! # Litfold
//!
//! A constant-folding partial evaluator for TypeScript syntax trees held
//! as JSON.
//!
//! Litfold reduces the static parts of a program (literal configuration
//! tables, arithmetic on constants, references to sibling properties and
//! enum members) to plain values, without running the program.
//!
//! ## Architecture
//!
//! - **Parser collaborator**: Produce a raw JSON tree with integer kind codes
//! - **Tree Normalizer**: Replace kind codes with symbolic names
//! - **Literal Evaluator**: Reduce nodes to [`Value`]s, optionally resolving
//!   names against a [`SymbolTable`]
//! - **Extraction**: Locate declarations and post-process known tables
//!
//! ```
//! use litfold::{Evaluator, KindTable, Value};
//! use serde_json::json;
//!
//! let evaluator = Evaluator::new(KindTable::default());
//! let node = json!({
//!     "kind": "BinaryExpression",
//!     "left": {"kind": "FirstLiteralToken", "text": "3"},
//!     "operatorToken": {"kind": "AsteriskToken"},
//!     "right": {"kind": "FirstLiteralToken", "text": "4"}
//! });
//! assert_eq!(evaluator.literal(&node).unwrap(), Value::Int(12));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod context;
pub mod declarations;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod extract;
pub mod kinds;
pub mod node;
pub mod normalize;
pub mod parser;
pub mod scope;
pub mod value;

// Re-export main types
pub use builtins::Builtins;
pub use context::EvalContext;
pub use error::{EvalError, Result};
pub use eval::Evaluate;
pub use evaluator::Evaluator;
pub use kinds::KindTable;
pub use node::Node;
pub use normalize::normalize;
pub use parser::{ParserError, ScriptParser, SyntaxParser};
pub use scope::{DeclarationGroup, Initializer, Member, SymbolTable, SELF_SCOPE};
pub use value::{NativeFn, Object, Value};

/// Litfold version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
