//! Typed view over normalized syntax nodes
//!
//! The parser hands over plain JSON. [`Node::classify`] sorts a node into
//! the closed set of shapes the evaluator understands and pulls out the
//! fields that shape needs, so the evaluator matches on a sum type instead
//! of probing JSON keys.

use std::borrow::Cow;

use serde_json::Value as Json;

use crate::error::{EvalError, Result};

/// A normalized syntax node, borrowed from its JSON representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// `[a, b, ...]`
    ArrayLiteral {
        /// Element nodes
        elements: &'a [Json],
    },

    /// `{k: v, ...}`
    ObjectLiteral {
        /// `PropertyAssignment` nodes
        properties: &'a [Json],
    },

    /// `class C { ... }`, reduced like an object literal over its members
    ClassDeclaration {
        /// Member nodes
        members: &'a [Json],
    },

    /// A bare name
    Identifier {
        /// Unescaped identifier text
        name: Cow<'a, str>,
    },

    /// `"text"` or a template without substitutions
    StringLiteral {
        /// Literal text
        text: &'a str,
    },

    /// A numeric token
    NumericLiteral {
        /// Source text of the number
        text: &'a str,
    },

    /// `true` / `false`
    Boolean(bool),

    /// `null`
    Null,

    /// `this`
    This,

    /// `-x` and other prefix operators
    PrefixUnary {
        /// Operator, an integer kind code or a symbolic token name
        operator: &'a Json,
        /// Operand node
        operand: &'a Json,
    },

    /// `a op b`
    Binary {
        /// Left operand
        left: &'a Json,
        /// Operator token kind name
        operator: &'a str,
        /// Right operand
        right: &'a Json,
    },

    /// `(x)` or `<T>x`
    Wrapper {
        /// Wrapped expression
        expression: &'a Json,
    },

    /// `f(args)`
    Call {
        /// Callee expression
        callee: &'a Json,
        /// Argument nodes
        arguments: &'a [Json],
    },

    /// `a.b`
    PropertyAccess {
        /// Base expression
        expression: &'a Json,
        /// Member name
        name: Cow<'a, str>,
    },

    /// `a[i]`
    ElementAccess {
        /// Base expression
        expression: &'a Json,
        /// Index expression
        argument: &'a Json,
    },

    /// A template literal with substitutions
    Template,

    /// `(x) => body`
    ArrowFunction {
        /// Parameter declaration nodes
        parameters: &'a [Json],
        /// Body node
        body: &'a Json,
    },
}

impl<'a> Node<'a> {
    /// Classify a normalized JSON node.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedKind` for kinds outside the supported set (and
    /// for nodes whose `kind` is missing or still an integer code), and
    /// `MalformedNode` when a supported kind lacks a field it needs.
    pub fn classify(json: &'a Json) -> Result<Self> {
        let kind = match json.get("kind") {
            Some(Json::String(kind)) => kind.as_str(),
            Some(Json::Number(code)) => {
                return Err(EvalError::UnrecognizedKind {
                    kind: format!("code {} (tree not normalized)", code),
                })
            }
            _ => {
                return Err(EvalError::UnrecognizedKind {
                    kind: "<missing>".to_string(),
                })
            }
        };

        let node = match kind {
            "ArrayLiteralExpression" => Node::ArrayLiteral {
                elements: array_field(json, kind, "elements")?,
            },
            "ObjectLiteralExpression" => Node::ObjectLiteral {
                properties: array_field(json, kind, "properties")?,
            },
            "ClassDeclaration" => Node::ClassDeclaration {
                members: array_field(json, kind, "members")?,
            },
            "Identifier" => Node::Identifier {
                name: identifier_text(json).ok_or_else(|| malformed(kind, "escapedText"))?,
            },
            "StringLiteral" | "FirstTemplateToken" | "NoSubstitutionTemplateLiteral" => {
                Node::StringLiteral {
                    text: str_field(json, kind, "text")?,
                }
            }
            "FirstLiteralToken" | "NumericLiteral" => Node::NumericLiteral {
                text: str_field(json, kind, "text")?,
            },
            "TrueKeyword" => Node::Boolean(true),
            "FalseKeyword" => Node::Boolean(false),
            "NullKeyword" => Node::Null,
            "ThisKeyword" => Node::This,
            "PrefixUnaryExpression" => Node::PrefixUnary {
                operator: field(json, kind, "operator")?,
                operand: field(json, kind, "operand")?,
            },
            "BinaryExpression" => Node::Binary {
                left: field(json, kind, "left")?,
                operator: field(json, kind, "operatorToken")?
                    .get("kind")
                    .and_then(Json::as_str)
                    .ok_or_else(|| malformed(kind, "operatorToken"))?,
                right: field(json, kind, "right")?,
            },
            "TypeAssertionExpression" | "ParenthesizedExpression" => Node::Wrapper {
                expression: field(json, kind, "expression")?,
            },
            "CallExpression" => Node::Call {
                callee: field(json, kind, "expression")?,
                arguments: array_field(json, kind, "arguments")?,
            },
            "PropertyAccessExpression" => Node::PropertyAccess {
                expression: field(json, kind, "expression")?,
                name: field(json, kind, "name")
                    .ok()
                    .and_then(identifier_text)
                    .ok_or_else(|| malformed(kind, "name"))?,
            },
            "ElementAccessExpression" => Node::ElementAccess {
                expression: field(json, kind, "expression")?,
                argument: field(json, kind, "argumentExpression")?,
            },
            "TemplateExpression" => Node::Template,
            "ArrowFunction" => Node::ArrowFunction {
                parameters: array_field(json, kind, "parameters")?,
                body: field(json, kind, "body")?,
            },
            other => {
                return Err(EvalError::UnrecognizedKind {
                    kind: other.to_string(),
                })
            }
        };

        Ok(node)
    }

    /// Symbolic name of this shape (for logging).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::ArrayLiteral { .. } => "ArrayLiteralExpression",
            Node::ObjectLiteral { .. } => "ObjectLiteralExpression",
            Node::ClassDeclaration { .. } => "ClassDeclaration",
            Node::Identifier { .. } => "Identifier",
            Node::StringLiteral { .. } => "StringLiteral",
            Node::NumericLiteral { .. } => "NumericLiteral",
            Node::Boolean(_) => "BooleanKeyword",
            Node::Null => "NullKeyword",
            Node::This => "ThisKeyword",
            Node::PrefixUnary { .. } => "PrefixUnaryExpression",
            Node::Binary { .. } => "BinaryExpression",
            Node::Wrapper { .. } => "ParenthesizedExpression",
            Node::Call { .. } => "CallExpression",
            Node::PropertyAccess { .. } => "PropertyAccessExpression",
            Node::ElementAccess { .. } => "ElementAccessExpression",
            Node::Template => "TemplateExpression",
            Node::ArrowFunction { .. } => "ArrowFunction",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Field Helpers
// ═══════════════════════════════════════════════════════════════════════

/// The symbolic kind of a JSON node, if it has one.
pub fn kind_of(json: &Json) -> Option<&str> {
    json.get("kind").and_then(Json::as_str)
}

/// The text of an identifier node, with TypeScript's leading-underscore
/// escaping undone (`___x` is the escaped form of `__x`).
pub fn identifier_text(json: &Json) -> Option<Cow<'_, str>> {
    let text = json.get("escapedText").and_then(Json::as_str)?;
    Some(match text.strip_prefix('_') {
        Some(rest) if rest.starts_with("__") => Cow::Owned(rest.to_string()),
        _ => Cow::Borrowed(text),
    })
}

/// Get a required field of a node.
pub(crate) fn field<'a>(json: &'a Json, kind: &str, name: &'static str) -> Result<&'a Json> {
    json.get(name).ok_or_else(|| malformed(kind, name))
}

fn array_field<'a>(json: &'a Json, kind: &str, name: &'static str) -> Result<&'a [Json]> {
    field(json, kind, name)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(kind, name))
}

fn str_field<'a>(json: &'a Json, kind: &str, name: &'static str) -> Result<&'a str> {
    field(json, kind, name)?
        .as_str()
        .ok_or_else(|| malformed(kind, name))
}

pub(crate) fn malformed(kind: &str, field: &'static str) -> EvalError {
    EvalError::MalformedNode {
        kind: kind.to_string(),
        field,
    }
}
