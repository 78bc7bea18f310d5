//! JSON serialization of plain values

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            // Unresolved nodes are emitted as-is so callers can post-process them
            Value::Node(node) => node.serialize(serializer),
            Value::Function(func) => Err(S::Error::custom(format!(
                "function `{}` cannot be serialized",
                func.name
            ))),
        }
    }
}

impl Value {
    /// Convert into a `serde_json::Value`.
    ///
    /// # Errors
    ///
    /// Fails if the value (or anything nested in it) is a function.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{NativeFn, Object};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_json_nested() {
        let mut inner = Object::new();
        inner.insert("v".to_string(), Value::Float(0.5));
        let value = Value::array(vec![Value::Int(1), Value::object(inner), Value::Null]);
        assert_eq!(value.to_json().unwrap(), json!([1, {"v": 0.5}, null]));
    }

    #[test]
    fn test_node_serializes_verbatim() {
        let node = json!({"kind": "ElementAccessExpression", "pos": 3});
        assert_eq!(Value::node(&node).to_json().unwrap(), node);
    }

    #[test]
    fn test_function_does_not_serialize() {
        let f = Value::Function(NativeFn::new("f", 0, |_| Ok(Value::Null)));
        let err = Value::array(vec![f]).to_json().unwrap_err();
        assert!(err.to_string().contains("`f`"));
    }
}
