//! Tree normalization
//!
//! Rewrites a raw parser tree so every `kind` field holds a symbolic
//! name instead of an integer code. Every sequence element and every
//! mapping value is visited regardless of its key.

use serde_json::{Map, Value as Json};

use crate::error::Result;
use crate::kinds::KindTable;

/// Normalize a raw tree.
///
/// Values that are not mappings, sequences, or integers under a `kind`
/// key pass through unchanged, so normalizing twice is the same as
/// normalizing once.
///
/// # Errors
///
/// Returns `UnknownKindCode` if the table lacks a code found in the tree.
pub fn normalize(tree: &Json, kinds: &KindTable) -> Result<Json> {
    let normalized = normalize_value(tree, None, kinds)?;
    tracing::debug!(codes = kinds.len(), "normalized syntax tree");
    Ok(normalized)
}

fn normalize_value(value: &Json, key: Option<&str>, kinds: &KindTable) -> Result<Json> {
    match value {
        Json::Number(n) if key == Some("kind") => match n.as_i64() {
            Some(code) => Ok(Json::String(kinds.name(code)?.to_string())),
            None => Ok(value.clone()),
        },
        Json::Array(items) => items
            .iter()
            .map(|item| normalize_value(item, None, kinds))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        Json::Object(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k.clone(), normalize_value(v, Some(k), kinds)?);
            }
            Ok(Json::Object(out))
        }
        _ => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvalError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> KindTable {
        KindTable::from_pairs([
            (80, "Identifier"),
            (210, "ArrayLiteralExpression"),
            (9, "FirstLiteralToken"),
        ])
    }

    #[test]
    fn test_nested_kinds_resolved() {
        let raw = json!({
            "kind": 210,
            "elements": [
                {"kind": 9, "text": "1"},
                {"kind": 80, "escapedText": "x"}
            ]
        });
        let expected = json!({
            "kind": "ArrayLiteralExpression",
            "elements": [
                {"kind": "FirstLiteralToken", "text": "1"},
                {"kind": "Identifier", "escapedText": "x"}
            ]
        });
        assert_eq!(normalize(&raw, &table()).unwrap(), expected);
    }

    #[test]
    fn test_integers_under_other_keys_untouched() {
        let raw = json!({"kind": 80, "pos": 12, "end": 14, "flags": [0, 1]});
        let normalized = normalize(&raw, &table()).unwrap();
        assert_eq!(normalized["pos"], json!(12));
        assert_eq!(normalized["flags"], json!([0, 1]));
    }

    #[test]
    fn test_idempotent() {
        let raw = json!({"kind": 210, "elements": [{"kind": 9, "text": "2"}]});
        let once = normalize(&raw, &table()).unwrap();
        let twice = normalize(&once, &table()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_code_aborts() {
        let raw = json!({"kind": 210, "elements": [{"kind": 4242}]});
        assert_eq!(
            normalize(&raw, &table()).unwrap_err(),
            EvalError::UnknownKindCode { code: 4242 }
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(normalize(&json!("text"), &table()).unwrap(), json!("text"));
        assert_eq!(normalize(&json!(null), &table()).unwrap(), json!(null));
    }
}
