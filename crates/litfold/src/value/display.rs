//! Display and Debug implementations for Value
//!
//! `Display` renders the text a value coerces to under string
//! concatenation, so it follows JavaScript spelling (`true`, `null`,
//! `Infinity`). `Debug` shows structure.

use std::fmt;

use super::*;

/// Format a float the way JavaScript's `String(n)` does.
///
/// Magnitudes from `1e-6` up to `1e21` are written out in full; anything
/// outside that range uses exponent form with an explicit sign.
pub(crate) fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        format!("{}", n)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "{:?}", s.as_str()),

            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),

            Value::Object(entries) => f.debug_map().entries(entries.iter()).finish(),

            Value::Function(func) => write!(f, "<function {}>", func.name),

            Value::Node(node) => {
                let kind = node
                    .get("kind")
                    .and_then(|k| k.as_str())
                    .unwrap_or("?");
                write!(f, "<node {}>", kind)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::String(s) => write!(f, "{}", s),

            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }

            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}", func.name),
            Value::Node(_) => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_display_exponent_ranges() {
        assert_eq!(format_float(1e21), "1e+21");
        assert_eq!(format_float(-2.5e30), "-2.5e+30");
        assert_eq!(format_float(1e-7), "1e-7");
        assert_eq!(format_float(1.5e-7), "1.5e-7");
        assert_eq!(format_float(1.5e20), "150000000000000000000");
        assert_eq!(format_float(0.000001), "0.000001");
        assert_eq!(format_float(-0.0), "0");
    }

    #[test]
    fn test_display_array_joins_with_commas() {
        let v = Value::from(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(v.to_string(), "1,a");
    }

    #[test]
    fn test_debug_node_shows_kind() {
        let v = Value::node(&serde_json::json!({"kind": "CallExpression"}));
        assert_eq!(format!("{:?}", v), "<node CallExpression>");
    }
}
