//! Registry of native callees, plus the standard `Math` scope

use std::collections::HashMap;

use crate::error::{EvalError, Result};
use crate::scope::DeclarationGroup;
use crate::value::{NativeFn, Object, Value};

/// Callee names resolved without a scope lookup.
///
/// When a call's callee reduces to a bare name, the evaluator looks the
/// name up here. The registry is supplied by the caller, so the evaluator
/// itself carries no domain-specific callees.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    functions: HashMap<String, NativeFn>,
}

impl Builtins {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard prelude loaded.
    pub fn prelude() -> Self {
        let mut builtins = Self::new();
        builtins.load_prelude();
        builtins
    }

    /// Load the standard prelude into this registry.
    pub fn load_prelude(&mut self) {
        self.register(NativeFn::new("toNameMap", 1, builtin_to_name_map));

        // Wave tables are post-processed by the caller, so these pass
        // their samples through untouched.
        for name in ["centerWave", "centerAndNormalizeWave", "rawChipToIntegrated"] {
            self.register(NativeFn::new(name, 1, builtin_identity));
        }
    }

    /// Register a native function under its own name.
    pub fn register(&mut self, func: NativeFn) {
        self.functions.insert(func.name.clone(), func);
    }

    /// Builder form of [`Builtins::register`].
    pub fn with(mut self, func: NativeFn) -> Self {
        self.register(func);
        self
    }

    /// Look up a native function by name.
    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.functions.get(name)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Prelude Implementations
// ═══════════════════════════════════════════════════════════════════════

/// Turn `[{name: "x", ...}, ...]` into `{"x": {...}, ...}`, dropping `name`.
fn builtin_to_name_map(args: &[Value]) -> Result<Value> {
    let fail = |message: String| EvalError::BuiltinFailed {
        name: "toNameMap".to_string(),
        message,
    };

    let records = args[0].as_array().ok_or_else(|| {
        fail(format!("expected a sequence, got {}", crate::error::type_name(&args[0])))
    })?;

    let mut out = Object::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let mut fields = record
            .as_object()
            .cloned()
            .ok_or_else(|| fail(format!("element {} is not a mapping", i)))?;
        let name = match fields.shift_remove("name") {
            Some(Value::String(name)) => name.as_str().to_string(),
            Some(other) => {
                return Err(fail(format!(
                    "element {} has a {} `name`",
                    i,
                    crate::error::type_name(&other)
                )))
            }
            None => return Err(fail(format!("element {} has no `name` field", i))),
        };
        out.insert(name, Value::object(fields));
    }

    Ok(Value::object(out))
}

fn builtin_identity(args: &[Value]) -> Result<Value> {
    Ok(args[0].clone())
}

// ═══════════════════════════════════════════════════════════════════════
// Math Scope
// ═══════════════════════════════════════════════════════════════════════

impl DeclarationGroup {
    /// A `Math` scope whose members are native numeric functions.
    pub fn math() -> Self {
        let unary: [(&str, fn(f64) -> f64); 15] = [
            ("abs", f64::abs),
            ("ceil", f64::ceil),
            ("floor", f64::floor),
            ("round", js_round),
            ("trunc", f64::trunc),
            ("sqrt", f64::sqrt),
            ("cbrt", f64::cbrt),
            ("exp", f64::exp),
            ("log", f64::ln),
            ("log2", f64::log2),
            ("log10", f64::log10),
            ("sin", f64::sin),
            ("cos", f64::cos),
            ("tan", f64::tan),
            ("sign", js_sign),
        ];
        let binary: [(&str, fn(f64, f64) -> f64); 3] =
            [("pow", f64::powf), ("atan2", f64::atan2), ("hypot", f64::hypot)];

        let mut group = DeclarationGroup::new("Math");
        for (name, f) in unary {
            group = group.with_native(name, NativeFn::new(name, 1, move |args| {
                Ok(Value::number(f(number_arg(name, &args[0])?)))
            }));
        }
        for (name, f) in binary {
            group = group.with_native(name, NativeFn::new(name, 2, move |args| {
                Ok(Value::number(f(
                    number_arg(name, &args[0])?,
                    number_arg(name, &args[1])?,
                )))
            }));
        }
        group
            .with_native(
                "min",
                NativeFn::new("min", -1, |args| {
                    fold_numbers("min", args, f64::INFINITY, f64::min)
                }),
            )
            .with_native(
                "max",
                NativeFn::new("max", -1, |args| {
                    fold_numbers("max", args, f64::NEG_INFINITY, f64::max)
                }),
            )
    }
}

fn number_arg(name: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| EvalError::BuiltinFailed {
        name: format!("Math.{}", name),
        message: format!("expected a number, got {}", crate::error::type_name(value)),
    })
}

fn fold_numbers(name: &str, args: &[Value], init: f64, f: fn(f64, f64) -> f64) -> Result<Value> {
    let mut acc = init;
    for arg in args {
        acc = f(acc, number_arg(name, arg)?);
    }
    Ok(Value::number(acc))
}

/// `Math.round` rounds halves toward positive infinity.
fn js_round(n: f64) -> f64 {
    // `n + 0.5` can round up before flooring
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn js_sign(n: f64) -> f64 {
    if n == 0.0 || n.is_nan() {
        n
    } else {
        n.signum()
    }
}
