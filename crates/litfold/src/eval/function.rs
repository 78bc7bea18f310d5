//! Arrow function literals
//!
//! General lambdas are not evaluated. The only recognized shape is the
//! semitone conversion `x => k * Math.log2(x)` (also with `Math.log`,
//! and with the factor on either side), which becomes a native function.

use serde_json::Value as Json;

use crate::error::{EvalError, Result};
use crate::node::{identifier_text, Node};
use crate::value::NativeFn;
use crate::{EvalContext, Value};

use super::Evaluate;

/// Logarithm used by a recognized formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogBase {
    E,
    Two,
}

/// Evaluate an arrow function literal.
///
/// # Errors
///
/// Returns `UnsupportedFunction` for any shape other than the known
/// logarithm formula.
pub fn eval_arrow_function(
    parameters: &[Json],
    body: &Json,
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    let [parameter] = parameters else {
        return Err(unsupported(format!(
            "expected exactly one parameter, found {}",
            parameters.len()
        )));
    };
    let param = parameter
        .get("name")
        .and_then(identifier_text)
        .ok_or_else(|| unsupported("parameter is not a plain identifier".to_string()))?;

    let Ok(Node::Binary {
        left,
        operator: "AsteriskToken",
        right,
    }) = Node::classify(unwrap_parens(body))
    else {
        return Err(unsupported("body is not a product".to_string()));
    };

    let (base, factor) = match (log_call(left, &param), log_call(right, &param)) {
        (Some(base), None) => (base, right),
        (None, Some(base)) => (base, left),
        _ => {
            return Err(unsupported(format!(
                "body is not `k * Math.log({})`",
                param
            )))
        }
    };

    let scale = factor
        .eval(&ctx.nested().with_try_eval(false))?
        .as_f64()
        .ok_or_else(|| unsupported("scale factor is not a number".to_string()))?;

    tracing::debug!(param = %param, scale, ?base, "recognized logarithm formula");
    let name = match base {
        LogBase::E => "semitones(log)",
        LogBase::Two => "semitones(log2)",
    };
    Ok(Value::Function(NativeFn::new(name, 1, move |args| {
        let x = args[0].as_f64().ok_or_else(|| EvalError::BuiltinFailed {
            name: name.to_string(),
            message: format!("expected a number, got {}", crate::error::type_name(&args[0])),
        })?;
        let log = match base {
            LogBase::E => x.ln(),
            LogBase::Two => x.log2(),
        };
        Ok(Value::number(scale * log))
    })))
}

fn unwrap_parens(mut node: &Json) -> &Json {
    while let Ok(Node::Wrapper { expression }) = Node::classify(node) {
        node = expression;
    }
    node
}

/// Match `Math.log(param)` / `Math.log2(param)`.
fn log_call(node: &Json, param: &str) -> Option<LogBase> {
    let Ok(Node::Call { callee, arguments }) = Node::classify(unwrap_parens(node)) else {
        return None;
    };
    let Ok(Node::PropertyAccess { expression, name }) = Node::classify(callee) else {
        return None;
    };
    let base = match name.as_ref() {
        "log" => LogBase::E,
        "log2" => LogBase::Two,
        _ => return None,
    };
    let is_math = matches!(
        Node::classify(expression),
        Ok(Node::Identifier { name }) if name == "Math"
    );
    let is_param = matches!(
        arguments,
        [arg] if matches!(Node::classify(arg), Ok(Node::Identifier { name }) if name == param)
    );
    (is_math && is_param).then_some(base)
}

fn unsupported(reason: String) -> EvalError {
    EvalError::UnsupportedFunction { reason }
}
