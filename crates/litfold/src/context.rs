//! Evaluation context configuration

use serde_json::Value as Json;

use crate::builtins::Builtins;
use crate::error::{EvalError, Result};
use crate::eval::Evaluate;
use crate::kinds::KindTable;
use crate::scope::SymbolTable;
use crate::value::Value;

/// Default nesting limit for a single evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration and state for evaluation.
///
/// This is passed through all evaluation calls and controls whether
/// calls and member accesses are resolved, how deep evaluation may
/// recurse, and which tables names are resolved against. It is `Copy`;
/// each nested evaluation gets its own context one level deeper.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Resolve calls, member accesses and `this` instead of passing them through
    pub try_eval: bool,

    /// Leave the children of the top-level collection unreduced
    pub shallow: bool,

    /// Maximum number of nested scope lookups and calls (guards against
    /// self-referential scopes)
    pub max_depth: usize,

    depth: usize,
    kinds: &'a KindTable,
    builtins: &'a Builtins,
    scopes: &'a SymbolTable,
}

impl<'a> EvalContext<'a> {
    /// Create a context in plain literal mode.
    pub fn new(kinds: &'a KindTable, builtins: &'a Builtins, scopes: &'a SymbolTable) -> Self {
        Self {
            try_eval: false,
            shallow: false,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            kinds,
            builtins,
            scopes,
        }
    }

    /// Enable or disable try-eval mode.
    pub fn with_try_eval(mut self, try_eval: bool) -> Self {
        self.try_eval = try_eval;
        self
    }

    /// Enable or disable shallow reduction of the top-level node.
    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    /// Set a custom nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Context for evaluating a child node.
    ///
    /// Children are always reduced fully: `shallow` only applies to the
    /// node the context was created for. Syntactic nesting does not count
    /// toward the depth limit; only [`EvalContext::enter`] does.
    pub fn nested(&self) -> Self {
        Self {
            shallow: false,
            ..*self
        }
    }

    /// Context for a scope lookup or call, one level deeper.
    ///
    /// These are the only places a reduction can re-enter itself
    /// (`a = this.b; b = this.a`), so they carry the depth guard.
    ///
    /// # Errors
    ///
    /// Returns `DepthExceeded` once the limit is reached.
    pub fn enter(&self) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self.nested()
        })
    }

    /// Number of scope lookups and calls currently in progress.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The kind table used to resolve operator codes.
    pub fn kinds(&self) -> &'a KindTable {
        self.kinds
    }

    /// The native callee registry.
    pub fn builtins(&self) -> &'a Builtins {
        self.builtins
    }

    /// The symbol table used for cross-scope lookup.
    pub fn scopes(&self) -> &'a SymbolTable {
        self.scopes
    }

    /// Reduce `node` under this context.
    pub fn evaluate(&self, node: &Json) -> Result<Value> {
        node.eval(self)
    }
}
