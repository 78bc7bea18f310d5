//! Call expression evaluation (try-eval mode)

use serde_json::Value as Json;

use crate::error::{type_name, EvalError, Result};
use crate::value::NativeFn;
use crate::{EvalContext, Value};

use super::Evaluate;

/// Evaluate a call expression.
///
/// The callee is reduced first. A bare name is looked up in the
/// context's builtin registry; anything else must already be a
/// function value (e.g. a `Math` member or a sequence's `map`).
///
/// # Errors
///
/// Returns `NotCallable` if the callee does not resolve to a function.
pub fn eval_call(callee: &Json, arguments: &[Json], ctx: &EvalContext<'_>) -> Result<Value> {
    let nested = ctx.enter()?;
    let target = callee.eval(&nested)?;

    let args = arguments
        .iter()
        .map(|arg| arg.eval(&nested))
        .collect::<Result<Vec<_>>>()?;

    let func = resolve_callee(target, ctx)?;
    tracing::debug!(callee = %func.name, args = args.len(), "calling native function");
    func.call(&args)
}

/// Resolve a reduced callee to a native function.
fn resolve_callee(target: Value, ctx: &EvalContext<'_>) -> Result<NativeFn> {
    match target {
        Value::Function(func) => Ok(func),
        Value::String(name) => ctx
            .builtins()
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| EvalError::NotCallable {
                found: format!("unresolved name `{}`", name),
            }),
        other => Err(EvalError::NotCallable {
            found: type_name(&other).to_string(),
        }),
    }
}

/// Call a value as a function.
///
/// # Errors
///
/// Returns `NotCallable` if the value is not a function.
pub fn call_value(func: &Value, args: &[Value]) -> Result<Value> {
    match func {
        Value::Function(f) => f.call(args),
        other => Err(EvalError::NotCallable {
            found: type_name(other).to_string(),
        }),
    }
}
