//! Literal reduction of syntax nodes

pub mod binary;
pub mod call;
pub mod collection;
pub mod function;
pub mod literal;
pub mod member;
pub mod unary;

use serde_json::Value as Json;

use crate::error::{EvalError, Result};
use crate::node::Node;
use crate::scope::SELF_SCOPE;
use crate::{EvalContext, Value};

/// Trait for reducing syntax nodes to plain values.
///
/// This is the core abstraction of the evaluator. A node either reduces
/// to a value, passes through unresolved (outside try-eval mode), or
/// raises an error naming what could not be reduced.
pub trait Evaluate {
    /// Reduce this node under the given context.
    fn eval(&self, ctx: &EvalContext<'_>) -> Result<Value>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Json {
    fn eval(&self, ctx: &EvalContext<'_>) -> Result<Value> {
        match self {
            Json::Object(_) => eval_node(self, ctx),
            // Bare JSON is already data (hand-built scopes use it for initializers)
            Json::Array(items) => {
                let nested = ctx.nested();
                items
                    .iter()
                    .map(|item| item.eval(&nested))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::array)
            }
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => Ok(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::number(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Json::String(s) => Ok(Value::string(s.as_str())),
        }
    }
}

fn eval_node(json: &Json, ctx: &EvalContext<'_>) -> Result<Value> {
    let node = Node::classify(json)?;
    tracing::trace!(
        kind = node.kind_name(),
        depth = ctx.depth(),
        try_eval = ctx.try_eval,
        "reducing node"
    );

    match node {
        Node::ArrayLiteral { elements } => collection::eval_array(elements, ctx),
        Node::ObjectLiteral { properties } => {
            collection::eval_object("ObjectLiteralExpression", properties, ctx)
        }
        Node::ClassDeclaration { members } => {
            collection::eval_object("ClassDeclaration", members, ctx)
        }

        Node::Identifier { name } => Ok(Value::string(name)),
        Node::StringLiteral { text } => Ok(Value::string(text)),
        Node::NumericLiteral { text } => literal::eval_number(text),
        Node::Boolean(b) => Ok(Value::Bool(b)),
        Node::Null => Ok(Value::Null),

        Node::PrefixUnary { operator, operand } => unary::eval_prefix_unary(operator, operand, ctx),
        Node::Binary {
            left,
            operator,
            right,
        } => binary::eval_binary(left, operator, right, ctx),

        // Transparent wrappers
        Node::Wrapper { expression } => expression.eval(&ctx.nested()),

        Node::ArrowFunction { parameters, body } => {
            function::eval_arrow_function(parameters, body, ctx)
        }

        // Resolved only in try-eval mode
        Node::This if ctx.try_eval => Ok(Value::string(SELF_SCOPE)),
        Node::Call { callee, arguments } if ctx.try_eval => {
            call::eval_call(callee, arguments, ctx)
        }
        Node::PropertyAccess { expression, name } if ctx.try_eval => {
            member::eval_property_access(expression, &name, ctx)
        }
        Node::ElementAccess {
            expression,
            argument,
        } if ctx.try_eval => member::eval_element_access(expression, argument, ctx),
        Node::Template if ctx.try_eval => Err(EvalError::Unreducible {
            kind: "TemplateExpression".to_string(),
        }),

        // Left for the caller outside try-eval mode
        Node::Call { .. }
        | Node::PropertyAccess { .. }
        | Node::ElementAccess { .. }
        | Node::Template => Ok(Value::node(json)),

        // `this` only means something when scopes are being resolved
        Node::This => Err(EvalError::UnrecognizedKind {
            kind: "ThisKeyword".to_string(),
        }),
    }
}
