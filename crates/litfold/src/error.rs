//! Error types for literal folding

use thiserror::Error;

use crate::value::Value;

/// Errors raised while normalizing or reducing a syntax tree.
///
/// Every variant is fatal for the evaluation that raised it. The
/// evaluator never substitutes a default for a node it cannot reduce.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The tree contains a node kind the evaluator has no case for
    #[error("unrecognized node kind `{kind}`")]
    UnrecognizedKind {
        /// Symbolic kind name (or a description when the kind is missing)
        kind: String,
    },

    /// A unary or binary operator outside the supported set
    #[error("unimplemented {form} operator `{op}`")]
    UnimplementedOperator {
        /// Operator token name
        op: String,
        /// `unary` or `binary`
        form: &'static str,
    },

    /// A call target did not resolve to something invocable
    #[error("call target is not callable: expected a function, found {found}")]
    NotCallable {
        /// Description of what the callee reduced to
        found: String,
    },

    /// A named property is missing from a declaration group
    #[error("property `{property}` not found in `{scope}`")]
    PropertyNotFound {
        /// Property name that was requested
        property: String,
        /// Owning scope name
        scope: String,
    },

    /// A scope name has no entry in the symbol table
    #[error("scope `{scope}` is not in the symbol table")]
    ScopeNotFound {
        /// Scope name that was requested
        scope: String,
    },

    /// A declaration could not be located in a tree
    #[error("{kind} `{name}` not found")]
    DeclarationNotFound {
        /// Declaration name (or kind, for structural searches)
        name: String,
        /// Declaration kind that was searched for
        kind: String,
    },

    /// A member access used a member name outside the supported set
    #[error("unsupported member operation `{member}` on {on}")]
    UnsupportedMember {
        /// Member name
        member: String,
        /// Type of the value the member was accessed on
        on: String,
    },

    /// The kind table has no entry for a code found in the tree
    #[error("syntax kind code {code} is missing from the kind table")]
    UnknownKindCode {
        /// The unmapped integer code
        code: i64,
    },

    /// A recognized node kind lacks a field its shape requires
    #[error("malformed `{kind}` node: missing or invalid `{field}`")]
    MalformedNode {
        /// Node kind
        kind: String,
        /// Field that was expected
        field: &'static str,
    },

    /// Binary operator applied to operands of the wrong types
    #[error("cannot apply `{op}` to {left} and {right}")]
    InvalidOperands {
        /// Operator token name
        op: String,
        /// Left operand type
        left: String,
        /// Right operand type
        right: String,
    },

    /// Unary operator applied to an operand of the wrong type
    #[error("cannot apply `{op}` to {operand}")]
    InvalidOperand {
        /// Operator token name
        op: String,
        /// Operand type
        operand: String,
    },

    /// A numeric literal whose text is not a number
    #[error("invalid numeric literal `{text}`")]
    InvalidNumber {
        /// Literal source text
        text: String,
    },

    /// A node that is only passed through outside try-eval mode
    #[error("`{kind}` cannot be reduced to a literal")]
    Unreducible {
        /// Node kind
        kind: String,
    },

    /// An arrow function whose shape is not a known formula
    #[error("unsupported function literal: {reason}")]
    UnsupportedFunction {
        /// Why the shape was rejected
        reason: String,
    },

    /// Element access past the end of a sequence
    #[error("index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Sequence length
        len: usize,
    },

    /// A native callable was invoked with the wrong number of arguments
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Callable name
        name: String,
        /// Expected argument count
        expected: usize,
        /// Actual argument count
        got: usize,
    },

    /// A native callable reported a failure
    #[error("`{name}` failed: {message}")]
    BuiltinFailed {
        /// Callable name
        name: String,
        /// Failure message
        message: String,
    },

    /// Scope lookups and calls nested deeper than the configured limit
    #[error("evaluation exceeded maximum depth of {limit}")]
    DepthExceeded {
        /// The configured limit
        limit: usize,
    },
}

/// Result type alias for evaluation
pub type Result<T> = std::result::Result<T, EvalError>;

/// Get a human-readable type name for a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
        Value::Function(_) => "function",
        Value::Node(_) => "unresolved node",
    }
}
