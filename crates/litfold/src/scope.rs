//! Declaration groups and the symbol table used for cross-scope lookup

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::{EvalError, Result};
use crate::value::Value;

/// Reserved scope name that `this` reduces to in try-eval mode.
pub const SELF_SCOPE: &str = "this";

/// What a declaration group member is bound to.
#[derive(Debug, Clone)]
pub enum Initializer {
    /// A syntax node, reduced in try-eval mode when looked up
    Node(Json),

    /// A value supplied by the caller (e.g. a native `Math` function)
    Native(Value),
}

/// A named property of a declaration group.
#[derive(Debug, Clone)]
pub struct Member {
    /// Property name
    pub name: String,

    /// Property initializer
    pub initializer: Initializer,
}

/// A named collection of class-like members, used as a lookup scope.
#[derive(Debug, Clone, Default)]
pub struct DeclarationGroup {
    name: String,
    members: Vec<Member>,
}

impl DeclarationGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member bound to a syntax node.
    pub fn with_node(mut self, name: impl Into<String>, node: Json) -> Self {
        self.push(name, Initializer::Node(node));
        self
    }

    /// Add a member bound to a native value.
    pub fn with_native(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, Initializer::Native(value.into()));
        self
    }

    /// Append a member.
    pub fn push(&mut self, name: impl Into<String>, initializer: Initializer) {
        self.members.push(Member {
            name: name.into(),
            initializer,
        });
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Find the first member named `property`.
    ///
    /// # Errors
    ///
    /// Returns `PropertyNotFound` naming the property and this group.
    pub fn lookup(&self, property: &str) -> Result<&Initializer> {
        self.members
            .iter()
            .find(|m| m.name == property)
            .map(|m| &m.initializer)
            .ok_or_else(|| EvalError::PropertyNotFound {
                property: property.to_string(),
                scope: self.name.clone(),
            })
    }
}

/// Mapping from scope names to declaration groups.
///
/// Read-only for the duration of an evaluation.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: IndexMap<String, DeclarationGroup>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group under its own name.
    pub fn insert(&mut self, group: DeclarationGroup) {
        self.scopes.insert(group.name.clone(), group);
    }

    /// Register a group under an explicit scope name.
    pub fn insert_as(&mut self, scope: impl Into<String>, group: DeclarationGroup) {
        self.scopes.insert(scope.into(), group);
    }

    /// Builder form of [`SymbolTable::insert`].
    pub fn with(mut self, group: DeclarationGroup) -> Self {
        self.insert(group);
        self
    }

    /// Register `group` as the enclosing scope that `this` refers to.
    pub fn with_self(mut self, group: DeclarationGroup) -> Self {
        self.insert_as(SELF_SCOPE, group);
        self
    }

    /// Get the group registered under `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ScopeNotFound` if nothing is registered under that name.
    pub fn get(&self, scope: &str) -> Result<&DeclarationGroup> {
        self.scopes
            .get(scope)
            .ok_or_else(|| EvalError::ScopeNotFound {
                scope: scope.to_string(),
            })
    }

    /// Check if a scope name is registered.
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Number of registered scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if no scopes are registered.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_returns_first_match() {
        let group = DeclarationGroup::new("Config")
            .with_native("a", 1i64)
            .with_native("a", 2i64);
        match group.lookup("a").unwrap() {
            Initializer::Native(v) => assert_eq!(v, &Value::Int(1)),
            other => panic!("expected native, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_missing_names_scope() {
        let group = DeclarationGroup::new("Config").with_node("a", json!(null));
        assert_eq!(
            group.lookup("b").unwrap_err(),
            EvalError::PropertyNotFound {
                property: "b".to_string(),
                scope: "Config".to_string(),
            }
        );
    }

    #[test]
    fn test_symbol_table_self_scope() {
        let table = SymbolTable::new().with_self(DeclarationGroup::new("Config"));
        assert!(table.contains(SELF_SCOPE));
        assert_eq!(table.get(SELF_SCOPE).unwrap().name(), "Config");
        assert!(matches!(
            table.get("Other"),
            Err(EvalError::ScopeNotFound { .. })
        ));
    }
}
