//! Numeric literal evaluation

use crate::error::{EvalError, Result};
use crate::Value;

/// Evaluate the text of a numeric token.
///
/// The parser hands over decimal text (hex, octal and binary forms are
/// already converted). Integers are kept exact when they fit in `i64`;
/// anything else is parsed as floating point and narrowed back to an
/// integer when it is integral.
///
/// # Errors
///
/// Returns `InvalidNumber` if the text is not a number.
pub fn eval_number(text: &str) -> Result<Value> {
    let cleaned: std::borrow::Cow<'_, str> = if text.contains('_') {
        text.replace('_', "").into()
    } else {
        text.into()
    };

    if let Ok(n) = cleaned.parse::<i64>() {
        return Ok(Value::Int(n));
    }

    cleaned
        .parse::<f64>()
        .map(Value::number)
        .map_err(|_| EvalError::InvalidNumber {
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_text() {
        assert_eq!(eval_number("3").unwrap(), Value::Int(3));
        assert_eq!(eval_number("0").unwrap(), Value::Int(0));
    }

    #[test]
    fn test_float_text() {
        assert_eq!(eval_number("3.5").unwrap(), Value::Float(3.5));
        assert_eq!(eval_number(".25").unwrap(), Value::Float(0.25));
    }

    #[test]
    fn test_integral_float_text_narrows() {
        assert_eq!(eval_number("3.0").unwrap(), Value::Int(3));
        assert_eq!(eval_number("1e3").unwrap(), Value::Int(1000));
    }

    #[test]
    fn test_separators() {
        assert_eq!(eval_number("1_000").unwrap(), Value::Int(1000));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(
            eval_number("0xZZ").unwrap_err(),
            EvalError::InvalidNumber {
                text: "0xZZ".to_string()
            }
        );
    }
}
