//! Syntax kind code table
//!
//! The parser collaborator emits node kinds as integer codes. A
//! [`KindTable`] maps those codes back to symbolic names. It is built once
//! (usually from the parser's own enum dump) and then only read.

use std::collections::HashMap;

use crate::error::{EvalError, Result};

/// Immutable mapping from integer syntax kind codes to symbolic names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindTable {
    names: HashMap<i64, String>,
}

impl KindTable {
    /// Build a table from `(code, name)` pairs.
    ///
    /// When a code appears more than once the first name wins.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut names = HashMap::new();
        for (code, name) in pairs {
            names.entry(code).or_insert_with(|| name.into());
        }
        Self { names }
    }

    /// Build a table from a serialized TypeScript-style enum object.
    ///
    /// Such objects are bidirectional: `{"0": "Unknown", "Unknown": 0, ...}`.
    /// Only the `code -> name` direction is kept.
    ///
    /// # Errors
    ///
    /// Returns `MalformedNode` if the input is not a JSON object.
    pub fn from_enum_json(json: &serde_json::Value) -> Result<Self> {
        let entries = json.as_object().ok_or_else(|| EvalError::MalformedNode {
            kind: "SyntaxKind".to_string(),
            field: "entries",
        })?;

        let names = entries
            .iter()
            .filter_map(|(key, value)| {
                let code = key.parse::<i64>().ok()?;
                let name = value.as_str()?;
                Some((code, name.to_string()))
            })
            .collect();

        Ok(Self { names })
    }

    /// Resolve a code to its symbolic name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKindCode` if the table has no entry for `code`.
    pub fn name(&self, code: i64) -> Result<&str> {
        self.names
            .get(&code)
            .map(String::as_str)
            .ok_or(EvalError::UnknownKindCode { code })
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_enum_json_keeps_reverse_direction() {
        let table = KindTable::from_enum_json(&json!({
            "0": "Unknown",
            "Unknown": 0,
            "9": "FirstLiteralToken",
            "NumericLiteral": 9,
            "FirstLiteralToken": 9
        }))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.name(9).unwrap(), "FirstLiteralToken");
        assert_eq!(table.name(0).unwrap(), "Unknown");
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let table = KindTable::from_pairs([(1, "EndOfFileToken")]);
        assert_eq!(
            table.name(2).unwrap_err(),
            EvalError::UnknownKindCode { code: 2 }
        );
    }

    #[test]
    fn test_from_pairs_first_name_wins() {
        let table = KindTable::from_pairs([(9, "FirstLiteralToken"), (9, "NumericLiteral")]);
        assert_eq!(table.name(9).unwrap(), "FirstLiteralToken");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(KindTable::from_enum_json(&json!([1, 2])).is_err());
    }
}
