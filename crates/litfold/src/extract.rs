//! Extraction of synth configuration tables
//!
//! Helpers that sit on top of the evaluator: build the symbol table a
//! configuration class needs, reduce single properties, and apply the
//! post-processing some tables need (wave normalization, unison voice
//! offsets).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Json;

use crate::declarations::{find_class, find_enum, property_of_class};
use crate::error::{EvalError, Result};
use crate::evaluator::Evaluator;
use crate::node::{identifier_text, Node};
use crate::scope::{DeclarationGroup, SymbolTable, SELF_SCOPE};
use crate::value::Value;

/// Enums the synth configuration class refers to.
pub const CONFIG_ENUMS: &[&str] = &[
    "EffectType",
    "GranularEnvelopeType",
    "EnvelopeComputeIndex",
    "InstrumentType",
];

/// Build the symbol table for reducing properties of `class_name`.
///
/// The class is registered under its own name and as the enclosing
/// scope (`this`); each enum becomes a group whose members reduce to
/// their own names; `Math` provides native numeric functions.
///
/// # Errors
///
/// Returns `DeclarationNotFound` if the class or an enum is missing.
pub fn config_scope(
    source_file: &Json,
    class_name: &str,
    enums: &[&str],
) -> Result<SymbolTable> {
    let class = DeclarationGroup::from_class(find_class(source_file, class_name)?)?;

    let mut scopes = SymbolTable::new();
    scopes.insert_as(SELF_SCOPE, class.clone());
    scopes.insert(class);
    for name in enums {
        scopes.insert(DeclarationGroup::from_enum(find_enum(source_file, name)?)?);
    }
    scopes.insert(DeclarationGroup::math());

    tracing::debug!(class = class_name, scopes = scopes.len(), "built configuration scope");
    Ok(scopes)
}

/// Reduce one property of a class in try-eval mode.
pub fn property(
    evaluator: &Evaluator,
    scopes: &SymbolTable,
    class: &Json,
    name: &str,
) -> Result<Value> {
    evaluator.resolve(property_of_class(class, name)?, scopes)
}

// ═══════════════════════════════════════════════════════════════════════
// Chip Waves
// ═══════════════════════════════════════════════════════════════════════

/// Reduce `rawChipWaves` to normalized sample tables keyed by wave name.
///
/// Each entry's `samples` is a call like `centerAndNormalizeWave([...])`.
/// The entries are reduced shallowly so the call stays opaque; when the
/// callee name contains `Normalize` the samples are divided by their mean
/// absolute value. Every sample is then scaled by the entry's
/// `expression`. Centering is skipped since integration removes any DC
/// offset anyway.
///
/// # Errors
///
/// Returns `MalformedNode` when an entry does not have that shape, and
/// `BuiltinFailed` when a normalized wave is empty or all zero.
pub fn chip_waves(evaluator: &Evaluator, class: &Json) -> Result<IndexMap<String, Vec<f64>>> {
    let entries = evaluator.shallow(name_map_argument(class, "rawChipWaves")?)?;
    let entries = entries.as_array().ok_or_else(|| shape("rawChipWaves", "arguments"))?;

    let mut waves = IndexMap::with_capacity(entries.len());
    for entry in entries {
        let node = entry.as_node().ok_or_else(|| shape("rawChipWaves entry", "node"))?;
        let fields = evaluator.shallow(node)?;

        let name = field_value(evaluator, &fields, "name")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| shape("rawChipWaves entry", "name"))?;
        let expression = field_value(evaluator, &fields, "expression")?
            .as_f64()
            .ok_or_else(|| shape("rawChipWaves entry", "expression"))?;

        let samples_node = fields
            .get("samples")
            .and_then(Value::as_node)
            .ok_or_else(|| shape("rawChipWaves entry", "samples"))?;
        let Ok(Node::Call {
            callee,
            arguments: [samples, ..],
        }) = Node::classify(samples_node)
        else {
            return Err(shape("rawChipWaves entry", "samples"));
        };
        let operation =
            identifier_text(callee).ok_or_else(|| shape("rawChipWaves entry", "samples"))?;

        let samples = numbers(&evaluator.literal(samples)?, "samples")?;
        let average = if operation.contains("Normalize") {
            let average = samples.iter().map(|s| s.abs()).sum::<f64>() / samples.len() as f64;
            // An empty table gives 0/0
            if average == 0.0 || average.is_nan() {
                return Err(EvalError::BuiltinFailed {
                    name: operation.into_owned(),
                    message: format!("wave `{}` has no nonzero samples to normalize", name),
                });
            }
            average
        } else {
            1.0
        };

        tracing::debug!(wave = %name, %operation, len = samples.len(), "reduced chip wave");
        waves.insert(name, samples.iter().map(|s| s / average * expression).collect());
    }
    Ok(waves)
}

// ═══════════════════════════════════════════════════════════════════════
// Unisons
// ═══════════════════════════════════════════════════════════════════════

/// One voice of a unison preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnisonVoice {
    /// Frequency multiplier
    pub freq: f64,
    /// Amplitude multiplier
    pub expr: f64,
}

/// A unison preset with its per-voice offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unison {
    /// Preset name
    pub name: String,
    /// Voices, the first one unshifted in sign
    pub voices: Vec<UnisonVoice>,
}

/// Reduce `unisons` and derive each preset's voice offsets.
///
/// Voice `i` is detuned by `offset + spread` semitones, minus
/// `2·i·spread / max(1, voices - 1)` for every voice after the first;
/// voices after the first also take the preset's `sign`.
///
/// # Errors
///
/// Returns `MalformedNode` when a preset lacks a numeric field.
pub fn unisons(evaluator: &Evaluator, class: &Json) -> Result<Vec<Unison>> {
    let presets = evaluator.literal(name_map_argument(class, "unisons")?)?;
    let presets = presets.as_array().ok_or_else(|| shape("unisons", "arguments"))?;

    presets
        .iter()
        .map(|preset| -> Result<Unison> {
            let name = preset
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| shape("unison", "name"))?
                .to_string();
            let voices = number_field(preset, "voices")?;
            let spread = number_field(preset, "spread")?;
            let offset = number_field(preset, "offset")?;
            let expression = number_field(preset, "expression")?;
            let sign = number_field(preset, "sign")?;

            let divisor = (voices - 1.0).max(1.0);
            let voices = (0..voices as i64)
                .map(|i| {
                    let detune = if i > 0 {
                        2.0 * i as f64 * spread / divisor
                    } else {
                        0.0
                    };
                    UnisonVoice {
                        freq: 2f64.powf((offset + spread - detune) / 12.0),
                        expr: expression * if i > 0 { sign } else { 1.0 },
                    }
                })
                .collect();

            Ok(Unison { name, voices })
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Presets
// ═══════════════════════════════════════════════════════════════════════

/// Category holding user-made instruments rather than built-in presets.
pub const CUSTOM_CATEGORY: &str = "Custom Instruments";

/// A named group of instrument presets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetCategory {
    /// Category name
    pub name: String,
    /// Preset records, each reduced to plain data
    pub presets: Vec<Value>,
}

/// Reduce `presetCategories` to its built-in preset categories.
///
/// Each category's `presets` is a call (usually a type-asserted
/// `toNameMap([...])`). Only the array handed to it is reduced, so the
/// records stay in order and keep their own `name` fields.
/// [`CUSTOM_CATEGORY`] is skipped.
///
/// # Errors
///
/// Returns `MalformedNode` when a category does not have that shape.
pub fn presets(evaluator: &Evaluator, class: &Json) -> Result<Vec<PresetCategory>> {
    let categories = evaluator.literal(name_map_argument(class, "presetCategories")?)?;
    let categories = categories
        .as_array()
        .ok_or_else(|| shape("presetCategories", "arguments"))?;

    let mut result = Vec::with_capacity(categories.len());
    for category in categories {
        let name = category
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| shape("preset category", "name"))?;
        if name == CUSTOM_CATEGORY {
            continue;
        }

        let mut node = category
            .get("presets")
            .and_then(Value::as_node)
            .ok_or_else(|| shape("preset category", "presets"))?;
        while let Ok(Node::Wrapper { expression }) = Node::classify(node) {
            node = expression;
        }
        let Ok(Node::Call {
            arguments: [records, ..],
            ..
        }) = Node::classify(node)
        else {
            return Err(shape("preset category", "presets"));
        };

        let presets = evaluator
            .literal(records)?
            .as_array()
            .ok_or_else(|| shape("preset category", "presets"))?
            .to_vec();
        tracing::debug!(category = name, len = presets.len(), "reduced preset category");
        result.push(PresetCategory {
            name: name.to_string(),
            presets,
        });
    }
    Ok(result)
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

/// The array handed to a `toNameMap(...)` property initializer.
fn name_map_argument<'a>(class: &'a Json, property: &'static str) -> Result<&'a Json> {
    let mut node = property_of_class(class, property)?;
    while let Ok(Node::Wrapper { expression }) = Node::classify(node) {
        node = expression;
    }
    match Node::classify(node) {
        Ok(Node::Call { arguments: [first, ..], .. }) => Ok(first),
        _ => Err(shape(property, "arguments")),
    }
}

fn field_value(evaluator: &Evaluator, fields: &Value, key: &'static str) -> Result<Value> {
    let node = fields
        .get(key)
        .and_then(Value::as_node)
        .ok_or_else(|| shape("rawChipWaves entry", key))?;
    evaluator.literal(node)
}

fn numbers(value: &Value, field: &'static str) -> Result<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| shape("rawChipWaves entry", field))?
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| shape("rawChipWaves entry", field)))
        .collect()
}

fn number_field(value: &Value, key: &'static str) -> Result<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| shape("unison", key))
}

fn shape(kind: &str, field: &'static str) -> EvalError {
    EvalError::MalformedNode {
        kind: kind.to_string(),
        field,
    }
}
