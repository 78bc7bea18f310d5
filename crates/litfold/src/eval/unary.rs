//! Unary operation evaluation

use serde_json::Value as Json;

use crate::error::{type_name, EvalError, Result};
use crate::node::malformed;
use crate::{EvalContext, Value};

use super::Evaluate;

/// Evaluate a prefix unary expression. Only negation is supported.
///
/// The operator is stored as an integer kind code that normalization
/// does not touch (it is not under a `kind` key), so it is resolved
/// through the context's kind table here.
///
/// # Errors
///
/// Returns `UnimplementedOperator` for any operator other than `-`.
pub fn eval_prefix_unary(operator: &Json, operand: &Json, ctx: &EvalContext<'_>) -> Result<Value> {
    let op = match operator {
        Json::Number(n) => {
            let code = n
                .as_i64()
                .ok_or_else(|| malformed("PrefixUnaryExpression", "operator"))?;
            ctx.kinds().name(code)?
        }
        Json::String(name) => name.as_str(),
        _ => return Err(malformed("PrefixUnaryExpression", "operator")),
    };

    match op {
        "MinusToken" => eval_neg(operand.eval(&ctx.nested())?),
        other => Err(EvalError::UnimplementedOperator {
            op: other.to_string(),
            form: "unary",
        }),
    }
}

/// Evaluate numeric negation (`-x`).
pub(crate) fn eval_neg(operand: Value) -> Result<Value> {
    match operand {
        Value::Int(n) => Ok(n
            .checked_neg()
            .map(Value::Int)
            .unwrap_or_else(|| Value::Float(-(n as f64)))),
        Value::Float(n) => Ok(Value::number(-n)),
        other => Err(EvalError::InvalidOperand {
            op: "MinusToken".to_string(),
            operand: type_name(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neg_int() {
        assert_eq!(eval_neg(Value::Int(3)).unwrap(), Value::Int(-3));
    }

    #[test]
    fn test_neg_float() {
        assert_eq!(eval_neg(Value::Float(0.5)).unwrap(), Value::Float(-0.5));
    }

    #[test]
    fn test_neg_min_overflows_to_float() {
        assert_eq!(
            eval_neg(Value::Int(i64::MIN)).unwrap(),
            Value::Float(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn test_neg_string_fails() {
        assert!(matches!(
            eval_neg(Value::from("x")),
            Err(EvalError::InvalidOperand { .. })
        ));
    }
}
