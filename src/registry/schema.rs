//! Parameter schemas for operations.
//!
//! Every operation declares its tunable inputs as a static slice of
//! [`ParamSpec`]s. The spec is the single source of truth for widget
//! rendering, default seeding, and value coercion: any value that enters a
//! step's parameter map — default, slider edit, or imported JSON — passes
//! through [`ParamSpec::coerce`] first. Kernel-size parameters flagged `odd`
//! are snapped to the nearest odd integer ≥ 1 so the vision backend never
//! sees an even kernel.

use serde::{Deserialize, Serialize};

/// A parameter value as stored in a step and serialized in pipeline JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            // JSON round-trips may widen integers to floats; accept exact ones.
            ParamValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Choice(v) => Some(v),
            _ => None,
        }
    }
}

/// The value type of a parameter, with bounds where numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Integer in `[min, max]`, stepped by `step`.
    Int { min: i64, max: i64, step: i64 },
    /// Float in `[min, max]`.
    Float { min: f64, max: f64 },
    /// One of a fixed set of named choices.
    Choice { choices: &'static [&'static str] },
    Bool,
}

/// Descriptor for one tunable input of an operation.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Key in the step's parameter map and in pipeline JSON.
    pub name: &'static str,
    /// Label shown next to the widget.
    pub label: &'static str,
    pub kind: ParamKind,
    /// Default seeded into new steps (coerced like any other value).
    pub default: DefaultValue,
    /// Kernel-size constraint: value must be an odd integer ≥ 1.
    pub odd: bool,
}

/// Default value carried in the static schema.
///
/// Separate from [`ParamValue`] so the schema table can be `const`.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(&'static str),
}

impl ParamSpec {
    /// The default value for this parameter, after coercion.
    pub fn default_value(&self) -> ParamValue {
        let raw = match self.default {
            DefaultValue::Bool(v) => ParamValue::Bool(v),
            DefaultValue::Int(v) => ParamValue::Int(v),
            DefaultValue::Float(v) => ParamValue::Float(v),
            DefaultValue::Choice(v) => ParamValue::Choice(v.to_string()),
        };
        self.coerce(raw)
    }

    /// Coerce an arbitrary value into this parameter's domain.
    ///
    /// Applied at default seeding, on every UI edit, and to every imported
    /// value. Wrong-typed values fall back to the default rather than being
    /// rejected, so a hand-edited pipeline still loads.
    pub fn coerce(&self, value: ParamValue) -> ParamValue {
        match self.kind {
            ParamKind::Int { min, max, step } => {
                let v = match value.as_int() {
                    Some(v) => v,
                    None => match self.default {
                        DefaultValue::Int(d) => d,
                        _ => min,
                    },
                };
                let mut v = v.clamp(min, max);
                if step > 1 {
                    v = min + ((v - min) / step) * step;
                }
                if self.odd {
                    v = coerce_odd(v);
                }
                ParamValue::Int(v)
            }
            ParamKind::Float { min, max } => {
                let v = match value.as_float() {
                    Some(v) if v.is_finite() => v,
                    _ => match self.default {
                        DefaultValue::Float(d) => d,
                        _ => min,
                    },
                };
                ParamValue::Float(v.clamp(min, max))
            }
            ParamKind::Choice { choices } => {
                let v = value.as_str().unwrap_or("");
                if choices.contains(&v) {
                    ParamValue::Choice(v.to_string())
                } else {
                    let fallback = match self.default {
                        DefaultValue::Choice(d) => d,
                        _ => choices.first().copied().unwrap_or(""),
                    };
                    ParamValue::Choice(fallback.to_string())
                }
            }
            ParamKind::Bool => {
                let v = value.as_bool().unwrap_or(match self.default {
                    DefaultValue::Bool(d) => d,
                    _ => false,
                });
                ParamValue::Bool(v)
            }
        }
    }
}

/// Snap to the nearest odd integer ≥ 1; even inputs move up by one.
fn coerce_odd(v: i64) -> i64 {
    let v = v.max(1);
    if v % 2 == 0 {
        v + 1
    } else {
        v
    }
}
