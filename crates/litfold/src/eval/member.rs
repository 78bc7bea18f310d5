//! Member and element access evaluation (try-eval mode)

use std::sync::Arc;

use serde_json::Value as Json;

use crate::error::{type_name, EvalError, Result};
use crate::scope::Initializer;
use crate::value::{NativeFn, Object};
use crate::{EvalContext, Value};

use super::call::call_value;
use super::Evaluate;

/// Evaluate `base.name`.
///
/// A base that reduces to a name is a scope reference: `name` is looked
/// up in the declaration group the symbol table maps it to, and the
/// property's initializer is reduced in turn. Sequences and mappings
/// support a small fixed set of members.
///
/// # Errors
///
/// Returns `ScopeNotFound`/`PropertyNotFound` for failed lookups and
/// `UnsupportedMember` for members outside the supported set.
pub fn eval_property_access(expression: &Json, name: &str, ctx: &EvalContext<'_>) -> Result<Value> {
    let nested = ctx.nested();
    let base = expression.eval(&nested)?;

    match base {
        Value::String(scope) => resolve_scope_member(&scope, name, &nested),
        Value::Array(items) => array_member(items, name),
        Value::Object(entries) => object_member(entries, name),
        other => Err(unsupported(name, &other)),
    }
}

/// Look up `property` in the group registered as `scope` and reduce it.
pub fn resolve_scope_member(scope: &str, property: &str, ctx: &EvalContext<'_>) -> Result<Value> {
    let group = ctx.scopes().get(scope)?;
    tracing::debug!(scope, property, group = group.name(), "resolving scope member");

    match group.lookup(property)? {
        Initializer::Node(node) => node.eval(&ctx.enter()?.with_try_eval(true)),
        Initializer::Native(value) => Ok(value.clone()),
    }
}

fn array_member(items: Arc<Vec<Value>>, name: &str) -> Result<Value> {
    match name {
        "length" => Ok(Value::Int(items.len() as i64)),
        "map" => Ok(Value::Function(NativeFn::new("map", 1, move |args| {
            items
                .iter()
                .map(|item| call_value(&args[0], std::slice::from_ref(item)))
                .collect::<Result<Vec<_>>>()
                .map(Value::array)
        }))),
        _ => Err(EvalError::UnsupportedMember {
            member: name.to_string(),
            on: "sequence".to_string(),
        }),
    }
}

fn object_member(entries: Arc<Object>, name: &str) -> Result<Value> {
    match name {
        "length" => Ok(Value::Int(entries.len() as i64)),
        // Only reached from name-map call chains; the mapping is already complete
        "concat" | "reduce" => {
            let member = name.to_string();
            Ok(Value::Function(NativeFn::new(member, -1, move |_| {
                Ok(Value::Object(entries.clone()))
            })))
        }
        _ => Err(EvalError::UnsupportedMember {
            member: name.to_string(),
            on: "mapping".to_string(),
        }),
    }
}

/// Evaluate `base[index]`.
///
/// # Errors
///
/// Returns `IndexOutOfBounds` past the end of a sequence,
/// `PropertyNotFound` for a missing mapping key, and `InvalidOperands`
/// for other base/index combinations.
pub fn eval_element_access(
    expression: &Json,
    argument: &Json,
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    let nested = ctx.nested();
    let base = expression.eval(&nested)?;
    let index = argument.eval(&nested)?;

    match (&base, &index) {
        (Value::Array(items), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|idx| items.get(idx))
            .cloned()
            .ok_or(EvalError::IndexOutOfBounds {
                index: *i,
                len: items.len(),
            }),
        (Value::Object(entries), Value::String(_) | Value::Int(_)) => {
            let key = index.to_string();
            entries
                .get(&key)
                .cloned()
                .ok_or_else(|| EvalError::PropertyNotFound {
                    property: key,
                    scope: "mapping".to_string(),
                })
        }
        _ => Err(EvalError::InvalidOperands {
            op: "[]".to_string(),
            left: type_name(&base).to_string(),
            right: type_name(&index).to_string(),
        }),
    }
}

fn unsupported(member: &str, on: &Value) -> EvalError {
    EvalError::UnsupportedMember {
        member: member.to_string(),
        on: type_name(on).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_length_and_map() {
        let items = Arc::new(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(array_member(items.clone(), "length").unwrap(), Value::Int(2));

        let double = Value::Function(NativeFn::new("double", 1, |args| {
            Ok(Value::Int(args[0].as_i64().unwrap_or(0) * 2))
        }));
        let map = array_member(items, "map").unwrap();
        assert_eq!(
            call_value(&map, &[double]).unwrap(),
            Value::array(vec![Value::Int(2), Value::Int(4)])
        );
    }

    #[test]
    fn test_array_unknown_member() {
        assert_eq!(
            array_member(Arc::new(vec![]), "filter").unwrap_err(),
            EvalError::UnsupportedMember {
                member: "filter".to_string(),
                on: "sequence".to_string()
            }
        );
    }

    #[test]
    fn test_object_concat_returns_self() {
        let mut entries = Object::new();
        entries.insert("a".to_string(), Value::Int(1));
        let entries = Arc::new(entries);

        let concat = object_member(entries.clone(), "concat").unwrap();
        assert_eq!(
            call_value(&concat, &[Value::Null]).unwrap(),
            Value::Object(entries.clone())
        );
        assert_eq!(object_member(entries, "length").unwrap(), Value::Int(1));
    }
}
