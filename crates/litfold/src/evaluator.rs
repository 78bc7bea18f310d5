//! Caller-facing evaluator
//!
//! Owns the process-wide tables (kind codes, native callees) and hands
//! out [`EvalContext`]s borrowing them. Nothing here is mutated after
//! construction, so one `Evaluator` can be shared across threads.

use serde_json::Value as Json;

use crate::builtins::Builtins;
use crate::context::{EvalContext, DEFAULT_MAX_DEPTH};
use crate::error::Result;
use crate::kinds::KindTable;
use crate::normalize::normalize;
use crate::scope::SymbolTable;
use crate::value::Value;

/// Entry point for normalizing trees and reducing nodes.
#[derive(Debug, Clone)]
pub struct Evaluator {
    kinds: KindTable,
    builtins: Builtins,
    max_depth: usize,
}

impl Evaluator {
    /// Create an evaluator with the standard builtin prelude.
    pub fn new(kinds: KindTable) -> Self {
        Self::with_builtins(kinds, Builtins::prelude())
    }

    /// Create an evaluator with a custom builtin registry.
    pub fn with_builtins(kinds: KindTable, builtins: Builtins) -> Self {
        Self {
            kinds,
            builtins,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the limit on nested scope lookups and calls for every context
    /// this evaluator creates.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The kind table.
    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// The builtin registry.
    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Normalize a raw parser tree with this evaluator's kind table.
    pub fn normalize(&self, tree: &Json) -> Result<Json> {
        normalize(tree, &self.kinds)
    }

    /// Create a plain-literal-mode context over `scopes`.
    pub fn context<'a>(&'a self, scopes: &'a SymbolTable) -> EvalContext<'a> {
        EvalContext::new(&self.kinds, &self.builtins, scopes).with_max_depth(self.max_depth)
    }

    /// Reduce `node` with explicit mode flags.
    ///
    /// # Errors
    ///
    /// Returns the first error raised anywhere in the reduction.
    pub fn evaluate(
        &self,
        node: &Json,
        try_eval: bool,
        shallow: bool,
        scopes: &SymbolTable,
    ) -> Result<Value> {
        self.context(scopes)
            .with_try_eval(try_eval)
            .with_shallow(shallow)
            .evaluate(node)
    }

    /// Reduce `node` as a plain literal: calls and member accesses pass
    /// through unresolved.
    pub fn literal(&self, node: &Json) -> Result<Value> {
        self.evaluate(node, false, false, &SymbolTable::new())
    }

    /// Reduce only the top level of `node`, leaving its children as
    /// opaque nodes.
    pub fn shallow(&self, node: &Json) -> Result<Value> {
        self.evaluate(node, false, true, &SymbolTable::new())
    }

    /// Reduce `node` in try-eval mode, resolving names against `scopes`.
    pub fn resolve(&self, node: &Json, scopes: &SymbolTable) -> Result<Value> {
        self.evaluate(node, true, false, scopes)
    }
}
