//! Array, object and class literal evaluation

use serde_json::Value as Json;

use crate::error::{EvalError, Result};
use crate::node::{field, kind_of};
use crate::value::{format_float, Object};
use crate::{EvalContext, Value};

use super::Evaluate;

/// Evaluate an array literal.
///
/// In shallow mode the elements are returned as opaque nodes so the
/// caller can reduce each one individually.
///
/// # Errors
///
/// Returns errors from evaluating elements.
pub fn eval_array(elements: &[Json], ctx: &EvalContext<'_>) -> Result<Value> {
    if ctx.shallow {
        return Ok(Value::array(elements.iter().map(Value::node).collect()));
    }

    let nested = ctx.nested();
    elements
        .iter()
        .map(|elem| elem.eval(&nested))
        .collect::<Result<Vec<_>>>()
        .map(Value::array)
}

/// Evaluate the properties of an object literal (or members of a class)
/// into a mapping.
///
/// Keys are always reduced. In shallow mode values are returned as
/// opaque nodes. When two properties produce the same key the last one
/// wins.
///
/// # Errors
///
/// Returns `MalformedNode` for members without a name or initializer
/// (spreads, shorthand properties, methods) and for keys that do not
/// reduce to a string or number.
pub fn eval_object(kind: &str, properties: &[Json], ctx: &EvalContext<'_>) -> Result<Value> {
    let nested = ctx.nested();
    let mut entries = Object::with_capacity(properties.len());

    for property in properties {
        let property_kind = kind_of(property).unwrap_or(kind);
        let key = property_key(property_kind, field(property, property_kind, "name")?, &nested)?;
        let initializer = field(property, property_kind, "initializer")?;

        let value = if ctx.shallow {
            Value::node(initializer)
        } else {
            initializer.eval(&nested)?
        };

        if entries.insert(key.clone(), value).is_some() {
            tracing::warn!(key = %key, kind, "duplicate key in literal; last occurrence wins");
        }
    }

    Ok(Value::object(entries))
}

fn property_key(kind: &str, name: &Json, ctx: &EvalContext<'_>) -> Result<String> {
    match name.eval(ctx)? {
        Value::String(s) => Ok(s.as_str().to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(format_float(n)),
        _ => Err(EvalError::MalformedNode {
            kind: kind.to_string(),
            field: "name",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builtins, KindTable, SymbolTable};
    use serde_json::json;

    fn prop(name: &str, initializer: Json) -> Json {
        json!({
            "kind": "PropertyAssignment",
            "name": {"kind": "Identifier", "escapedText": name},
            "initializer": initializer
        })
    }

    fn num(text: &str) -> Json {
        json!({"kind": "FirstLiteralToken", "text": text})
    }

    #[test]
    fn test_empty_array() {
        let (kinds, builtins, scopes) = (KindTable::default(), Builtins::new(), SymbolTable::new());
        let ctx = EvalContext::new(&kinds, &builtins, &scopes);
        assert_eq!(eval_array(&[], &ctx).unwrap(), Value::array(vec![]));
    }

    #[test]
    fn test_shallow_array_keeps_nodes() {
        let (kinds, builtins, scopes) = (KindTable::default(), Builtins::new(), SymbolTable::new());
        let ctx = EvalContext::new(&kinds, &builtins, &scopes).with_shallow(true);
        let elements = [num("1"), num("2")];
        let result = eval_array(&elements, &ctx).unwrap();
        assert_eq!(
            result,
            Value::array(vec![Value::node(&elements[0]), Value::node(&elements[1])])
        );
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let (kinds, builtins, scopes) = (KindTable::default(), Builtins::new(), SymbolTable::new());
        let ctx = EvalContext::new(&kinds, &builtins, &scopes);
        let props = [prop("a", num("1")), prop("b", num("2")), prop("a", num("3"))];
        let result = eval_object("ObjectLiteralExpression", &props, &ctx).unwrap();
        let entries = result.as_object().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["a"], Value::Int(3));
    }

    #[test]
    fn test_numeric_and_string_keys() {
        let (kinds, builtins, scopes) = (KindTable::default(), Builtins::new(), SymbolTable::new());
        let ctx = EvalContext::new(&kinds, &builtins, &scopes);
        let props = [
            json!({"kind": "PropertyAssignment", "name": num("4"), "initializer": num("1")}),
            json!({
                "kind": "PropertyAssignment",
                "name": {"kind": "StringLiteral", "text": "two words"},
                "initializer": num("2")
            }),
        ];
        let result = eval_object("ObjectLiteralExpression", &props, &ctx).unwrap();
        assert_eq!(result.get("4"), Some(&Value::Int(1)));
        assert_eq!(result.get("two words"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_spread_is_malformed() {
        let (kinds, builtins, scopes) = (KindTable::default(), Builtins::new(), SymbolTable::new());
        let ctx = EvalContext::new(&kinds, &builtins, &scopes);
        let props = [json!({
            "kind": "SpreadAssignment",
            "expression": {"kind": "Identifier", "escapedText": "base"}
        })];
        assert_eq!(
            eval_object("ObjectLiteralExpression", &props, &ctx).unwrap_err(),
            EvalError::MalformedNode {
                kind: "SpreadAssignment".to_string(),
                field: "name",
            }
        );
    }
}
