//! Native callable values

use std::sync::Arc;

use super::Value;
use crate::error::{EvalError, Result};

/// Type alias for native function pointers to reduce complexity
pub type NativeFnPtr = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A native function exposed to the evaluator.
///
/// Builtins from the registry, member operations such as `map`, and
/// recognized formula shapes all reduce to one of these.
#[derive(Clone)]
pub struct NativeFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Create a native function with a fixed arity.
    pub fn new(
        name: impl Into<String>,
        arity: i32,
        func: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Invoke the function, checking arity first.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` when a fixed-arity function receives the
    /// wrong number of arguments, or whatever the function itself raises.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if self.arity >= 0 && args.len() != self.arity as usize {
            return Err(EvalError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity as usize,
                got: args.len(),
            });
        }
        (self.func)(args)
    }
}

impl std::fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}
