//! Binary operation evaluation

use serde_json::Value as Json;

use crate::error::{type_name, EvalError, Result};
use crate::{EvalContext, Value};

use super::Evaluate;

/// Binary operators the evaluator can fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+` (numeric addition or string concatenation)
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `>>`
    Shr,
}

impl BinaryOp {
    /// Map an operator token kind to a supported operator.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "PlusToken" => Some(BinaryOp::Add),
            "MinusToken" => Some(BinaryOp::Sub),
            "AsteriskToken" => Some(BinaryOp::Mul),
            "SlashToken" => Some(BinaryOp::Div),
            "GreaterThanGreaterThanToken" => Some(BinaryOp::Shr),
            _ => None,
        }
    }

    /// Source spelling, for error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Shr => ">>",
        }
    }
}

/// Evaluate a binary expression.
///
/// # Errors
///
/// Returns `UnimplementedOperator` for operators outside the supported
/// set, and `InvalidOperands` when the operand types do not fit.
pub fn eval_binary(
    left: &Json,
    operator: &str,
    right: &Json,
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    let op = BinaryOp::from_token(operator).ok_or_else(|| EvalError::UnimplementedOperator {
        op: operator.to_string(),
        form: "binary",
    })?;

    let nested = ctx.nested();
    let left = left.eval(&nested)?;
    let right = right.eval(&nested)?;
    apply(op, left, right)
}

/// Apply a binary operator to two reduced operands.
pub fn apply(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Sub => eval_arith(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => eval_arith(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => eval_div(left, right),
        BinaryOp::Shr => eval_shr(left, right),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic Operations
// ═══════════════════════════════════════════════════════════════════════

fn eval_add(left: Value, right: Value) -> Result<Value> {
    match (&left, &right) {
        // String concatenation coerces the other side to text
        (Value::String(_), other) | (other, Value::String(_)) => {
            if !is_scalar(other) {
                return Err(invalid(BinaryOp::Add, &left, &right));
            }
            Ok(Value::string(format!("{}{}", left, right)))
        }

        _ => eval_arith(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn eval_arith(
    op: BinaryOp,
    left: Value,
    right: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(int_op(*a, *b)
            .map(Value::Int)
            .unwrap_or_else(|| Value::number(float_op(*a as f64, *b as f64)))),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::number(float_op(a, b))),
            _ => Err(invalid(op, &left, &right)),
        },
    }
}

/// Division always happens in floating point; exact quotients narrow
/// back to integers.
fn eval_div(left: Value, right: Value) -> Result<Value> {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::number(a / b)),
        _ => Err(invalid(BinaryOp::Div, &left, &right)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Bitwise Operations
// ═══════════════════════════════════════════════════════════════════════

/// Arithmetic right shift on integers. Shifting by 64 or more leaves
/// only the sign.
fn eval_shr(left: Value, right: Value) -> Result<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) if *b >= 0 => Ok(Value::Int(match u32::try_from(*b) {
            Ok(shift) if shift < 64 => a >> shift,
            _ if *a < 0 => -1,
            _ => 0,
        })),
        _ => Err(invalid(BinaryOp::Shr, &left, &right)),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
    )
}

fn invalid(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidOperands {
        op: op.symbol().to_string(),
        left: type_name(left).to_string(),
        right: type_name(right).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ints() {
        assert_eq!(apply(BinaryOp::Add, Value::Int(1), Value::Int(2)).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_add_mixed_narrows() {
        assert_eq!(
            apply(BinaryOp::Add, Value::Float(0.5), Value::Float(1.5)).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            apply(BinaryOp::Add, Value::Int(1), Value::Float(0.25)).unwrap(),
            Value::Float(1.25)
        );
    }

    #[test]
    fn test_add_concatenates() {
        assert_eq!(
            apply(BinaryOp::Add, Value::from("a"), Value::Int(1)).unwrap(),
            Value::from("a1")
        );
        assert_eq!(
            apply(BinaryOp::Add, Value::Bool(true), Value::from("!")).unwrap(),
            Value::from("true!")
        );
    }

    #[test]
    fn test_add_string_and_sequence_fails() {
        let result = apply(BinaryOp::Add, Value::from("a"), Value::array(vec![]));
        assert!(matches!(result, Err(EvalError::InvalidOperands { .. })));
    }

    #[test]
    fn test_add_overflow_falls_back_to_float() {
        assert_eq!(
            apply(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)).unwrap(),
            Value::Float(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn test_sub_and_mul() {
        assert_eq!(apply(BinaryOp::Sub, Value::Int(1), Value::Int(3)).unwrap(), Value::Int(-2));
        assert_eq!(apply(BinaryOp::Mul, Value::Int(4), Value::Float(0.5)).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_div() {
        assert_eq!(apply(BinaryOp::Div, Value::Int(1), Value::Int(2)).unwrap(), Value::Float(0.5));
        assert_eq!(apply(BinaryOp::Div, Value::Int(6), Value::Int(3)).unwrap(), Value::Int(2));
        assert_eq!(
            apply(BinaryOp::Div, Value::Int(1), Value::Int(0)).unwrap(),
            Value::Float(f64::INFINITY)
        );
    }

    #[test]
    fn test_shr() {
        assert_eq!(apply(BinaryOp::Shr, Value::Int(8), Value::Int(1)).unwrap(), Value::Int(4));
        assert_eq!(apply(BinaryOp::Shr, Value::Int(-8), Value::Int(1)).unwrap(), Value::Int(-4));
        assert_eq!(apply(BinaryOp::Shr, Value::Int(-8), Value::Int(80)).unwrap(), Value::Int(-1));
        assert_eq!(apply(BinaryOp::Shr, Value::Int(8), Value::Int(64)).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_shr_requires_integers() {
        assert!(matches!(
            apply(BinaryOp::Shr, Value::Float(8.5), Value::Int(1)),
            Err(EvalError::InvalidOperands { .. })
        ));
        assert!(matches!(
            apply(BinaryOp::Shr, Value::Int(8), Value::Int(-1)),
            Err(EvalError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_arith_rejects_non_numbers() {
        assert!(matches!(
            apply(BinaryOp::Mul, Value::Null, Value::Int(1)),
            Err(EvalError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(BinaryOp::from_token("SlashToken"), Some(BinaryOp::Div));
        assert_eq!(BinaryOp::from_token("PercentToken"), None);
    }
}
