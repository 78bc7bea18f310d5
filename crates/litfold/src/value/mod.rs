//! Plain values produced by literal folding

mod callable;
mod display;
mod impls;
mod serialize;

pub use callable::{NativeFn, NativeFnPtr};
pub(crate) use display::format_float;

use indexmap::IndexMap;
use std::sync::Arc;

/// String-keyed mapping of plain values, in source order.
pub type Object = IndexMap<String, Value>;

/// A plain, language-agnostic value reduced from a syntax node.
///
/// Values are organized into three tiers:
/// - Tier 1: Scalars (no allocation)
/// - Tier 2: Heap-allocated sequences and mappings (Arc-wrapped)
/// - Tier 3: Opaque values that only exist mid-evaluation or outside
///   try-eval mode (native callables, unresolved nodes)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// `null`
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// Integral number
    Int(i64),

    /// Non-integral (or out of `i64` range) number
    Float(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Heap-Allocated Compound Types
    // ═══════════════════════════════════════════════════════════════════
    /// Text, also used for bare identifier names
    String(Arc<String>),

    /// Ordered sequence
    Array(Arc<Vec<Value>>),

    /// String-keyed mapping
    Object(Arc<Object>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Opaque Values
    // ═══════════════════════════════════════════════════════════════════
    /// Native callable (builtins, member operations, known formulas)
    Function(NativeFn),

    /// A node left unresolved outside try-eval mode, or an element kept
    /// opaque by a shallow reduction
    Node(Arc<serde_json::Value>),
}
