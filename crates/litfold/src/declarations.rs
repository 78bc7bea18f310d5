//! Locating declarations in a normalized tree
//!
//! These are the lookups a caller performs before evaluating: find a
//! class, enum or variable, pick one of its properties, and build the
//! declaration groups a symbol table is made of.

use serde_json::Value as Json;

use crate::error::{EvalError, Result};
use crate::node::{field, identifier_text, kind_of};
use crate::scope::{DeclarationGroup, Initializer};

/// Depth-first search for the first node of `kind`, in document order.
pub fn first_of_kind<'a>(tree: &'a Json, kind: &str) -> Option<&'a Json> {
    match tree {
        Json::Object(entries) => {
            if entries.get("kind").and_then(Json::as_str) == Some(kind) {
                return Some(tree);
            }
            entries.values().find_map(|v| first_of_kind(v, kind))
        }
        Json::Array(items) => items.iter().find_map(|v| first_of_kind(v, kind)),
        _ => None,
    }
}

/// Top-level statements of a source file node.
pub fn statements(source_file: &Json) -> Result<&[Json]> {
    field(source_file, "SourceFile", "statements")?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| EvalError::MalformedNode {
            kind: "SourceFile".to_string(),
            field: "statements",
        })
}

/// Name of a declaration node, if it has a plain identifier name.
pub fn declaration_name(node: &Json) -> Option<std::borrow::Cow<'_, str>> {
    node.get("name").and_then(identifier_text)
}

fn find_statement<'a>(
    source_file: &'a Json,
    kind: &str,
    name: &str,
    label: &str,
) -> Result<&'a Json> {
    statements(source_file)?
        .iter()
        .find(|n| kind_of(n) == Some(kind) && declaration_name(n).as_deref() == Some(name))
        .ok_or_else(|| EvalError::DeclarationNotFound {
            name: name.to_string(),
            kind: label.to_string(),
        })
}

/// Find a top-level class declaration by name.
///
/// # Errors
///
/// Returns `DeclarationNotFound` if no such class exists.
pub fn find_class<'a>(source_file: &'a Json, name: &str) -> Result<&'a Json> {
    find_statement(source_file, "ClassDeclaration", name, "class")
}

/// Find a top-level enum declaration by name.
///
/// # Errors
///
/// Returns `DeclarationNotFound` if no such enum exists.
pub fn find_enum<'a>(source_file: &'a Json, name: &str) -> Result<&'a Json> {
    find_statement(source_file, "EnumDeclaration", name, "enum")
}

/// Find the initializer of a top-level `const`/`let`/`var` binding.
///
/// # Errors
///
/// Returns `DeclarationNotFound` if no such binding exists, and
/// `MalformedNode` if it has no initializer.
pub fn find_variable<'a>(source_file: &'a Json, name: &str) -> Result<&'a Json> {
    let declaration = statements(source_file)?
        .iter()
        .filter(|n| matches!(kind_of(n), Some("FirstStatement" | "VariableStatement")))
        .filter_map(|n| n.get("declarationList")?.get("declarations")?.as_array())
        .flatten()
        .find(|d| declaration_name(d).as_deref() == Some(name))
        .ok_or_else(|| EvalError::DeclarationNotFound {
            name: name.to_string(),
            kind: "variable".to_string(),
        })?;

    field(declaration, "VariableDeclaration", "initializer")
}

/// Get the initializer of a class's property declaration.
///
/// # Errors
///
/// Returns `PropertyNotFound` naming the property and the class.
pub fn property_of_class<'a>(class: &'a Json, property: &str) -> Result<&'a Json> {
    let scope = declaration_name(class)
        .map(|n| n.into_owned())
        .unwrap_or_else(|| "<anonymous class>".to_string());

    field(class, "ClassDeclaration", "members")?
        .as_array()
        .into_iter()
        .flatten()
        .filter(|m| kind_of(m) == Some("PropertyDeclaration"))
        .find(|m| declaration_name(m).as_deref() == Some(property))
        .and_then(|m| m.get("initializer"))
        .ok_or(EvalError::PropertyNotFound {
            property: property.to_string(),
            scope,
        })
}

impl DeclarationGroup {
    /// Build a group from a class declaration.
    ///
    /// Every property declaration with an initializer becomes a member;
    /// methods and uninitialized properties are skipped.
    ///
    /// # Errors
    ///
    /// Returns `MalformedNode` if the class has no name or members.
    pub fn from_class(class: &Json) -> Result<Self> {
        let name = declaration_name(class).ok_or_else(|| EvalError::MalformedNode {
            kind: "ClassDeclaration".to_string(),
            field: "name",
        })?;
        let members = field(class, "ClassDeclaration", "members")?
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut group = DeclarationGroup::new(name);
        for member in members
            .iter()
            .filter(|m| kind_of(m) == Some("PropertyDeclaration"))
        {
            let initializer = member.get("initializer");
            if let (Some(prop), Some(init)) = (declaration_name(member), initializer) {
                group.push(prop, Initializer::Node(init.clone()));
            }
        }
        Ok(group)
    }

    /// Build a group from an enum declaration.
    ///
    /// Each member maps to its own name, so `Kind.foo` reduces to `"foo"`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedNode` if the enum or a member has no name.
    pub fn from_enum(enumeration: &Json) -> Result<Self> {
        let name = declaration_name(enumeration).ok_or_else(|| EvalError::MalformedNode {
            kind: "EnumDeclaration".to_string(),
            field: "name",
        })?;

        let mut group = DeclarationGroup::new(name);
        for member in field(enumeration, "EnumDeclaration", "members")?
            .as_array()
            .into_iter()
            .flatten()
        {
            let member_name = field(member, "EnumMember", "name")?;
            let text = identifier_text(member_name).ok_or_else(|| EvalError::MalformedNode {
                kind: "EnumMember".to_string(),
                field: "name",
            })?;
            group.push(text, Initializer::Node(member_name.clone()));
        }
        Ok(group)
    }
}
