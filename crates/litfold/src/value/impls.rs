//! Value trait implementations: constructors, extractors, From traits, PartialEq

use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a sequence value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    /// Create a mapping value
    pub fn object(entries: Object) -> Self {
        Value::Object(Arc::new(entries))
    }

    /// Create a pass-through value for an unresolved node
    pub fn node(node: &serde_json::Value) -> Self {
        Value::Node(Arc::new(node.clone()))
    }

    /// Create a number, preferring an integer when the value is exact.
    ///
    /// `3.0` becomes `Int(3)`; `3.5`, `NaN` and values outside the `i64`
    /// range stay floating point.
    pub fn number(n: f64) -> Self {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
        if n.is_finite() && n.fract() == 0.0 && n >= -LIMIT && n < LIMIT {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Value Extractors
    // ═══════════════════════════════════════════════════════════════════

    /// Extract an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract any number as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract sequence elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract mapping entries
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(entries) => Some(entries.as_ref()),
            _ => None,
        }
    }

    /// Extract the unresolved node
    pub fn as_node(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Node(node) => Some(node.as_ref()),
            _ => None,
        }
    }

    /// Look up a key in a mapping value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|entries| entries.get(key))
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::array(v.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(entries: Object) -> Self {
        Value::object(entries)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Value::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_narrows_integral_floats() {
        assert_eq!(Value::number(3.0), Value::Int(3));
        assert_eq!(Value::number(-0.0), Value::Int(0));
        assert_eq!(Value::number(3.5), Value::Float(3.5));
    }

    #[test]
    fn test_number_keeps_non_finite_and_huge_floats() {
        assert!(matches!(Value::number(f64::NAN), Value::Float(n) if n.is_nan()));
        assert_eq!(
            Value::number(f64::INFINITY),
            Value::Float(f64::INFINITY)
        );
        assert_eq!(Value::number(1e20), Value::Float(1e20));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(Value::Int(3), Value::Float(3.0));
    }

    #[test]
    fn test_extractors() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_i64(), None);

        let mut entries = Object::new();
        entries.insert("k".to_string(), Value::Int(1));
        let obj = Value::object(entries);
        assert_eq!(obj.get("k"), Some(&Value::Int(1)));
        assert_eq!(obj.get("missing"), None);
    }
}
