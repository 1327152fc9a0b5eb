//! Operation registry — the fixed catalog of available operations.
//!
//! Each entry pairs a parameter schema with a transform function. The
//! registry is composed once at startup ([`OperationRegistry::builtin`]) and
//! handed to the execution engine by reference; there is no runtime
//! registration. Adding a capability means adding a definition to
//! [`crate::vision::definitions`] at composition time.
//!
//! # Transform contract
//!
//! `transform(source, params, ctx) -> Result<RgbaImage, TransformError>`
//!
//! - `source` is borrowed and never mutated; the callee must not release it.
//! - `ctx.original` is the run's unprocessed raster, identical for every
//!   step of a run (used by operations that blend against the source).
//! - The callee returns exactly one newly allocated raster and converts to
//!   whatever channel layout its algorithm needs and back to RGBA8 before
//!   returning. Internal intermediates never outlive the call.

pub mod schema;

pub use schema::{DefaultValue, ParamKind, ParamSpec, ParamValue};

use image::RgbaImage;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Failure raised by a transform invocation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Read-only context passed to every transform of a run.
pub struct RunContext<'a> {
    /// The run's unprocessed source raster.
    pub original: &'a RgbaImage,
}

/// Signature every operation's transform conforms to.
pub type TransformFn =
    fn(&RgbaImage, &ResolvedParams<'_>, &RunContext<'_>) -> Result<RgbaImage, TransformError>;

/// Immutable registry entry: one operation kind.
#[derive(Clone, Copy)]
pub struct OperationDefinition {
    /// Unique identifier, also the `kind` field in pipeline JSON.
    pub kind: &'static str,
    /// Display name for the add-operation menu.
    pub label: &'static str,
    pub params: &'static [ParamSpec],
    pub transform: TransformFn,
}

impl OperationDefinition {
    /// Seed a fresh parameter map from the schema defaults.
    pub fn default_params(&self) -> BTreeMap<String, ParamValue> {
        self.params
            .iter()
            .map(|spec| (spec.name.to_string(), spec.default_value()))
            .collect()
    }

    pub fn param_spec(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }
}

/// Typed view over a step's parameter values for one schema.
///
/// Getters resolve schema-declared names only; values pass through
/// [`ParamSpec::coerce`] on the way out, so a transform always receives
/// in-bounds, odd-coerced inputs even if the map was tampered with.
pub struct ResolvedParams<'a> {
    specs: &'static [ParamSpec],
    values: &'a BTreeMap<String, ParamValue>,
}

impl<'a> ResolvedParams<'a> {
    pub fn new(specs: &'static [ParamSpec], values: &'a BTreeMap<String, ParamValue>) -> Self {
        Self { specs, values }
    }

    fn resolve(&self, name: &str) -> Option<ParamValue> {
        let spec = self.specs.iter().find(|s| s.name == name)?;
        let value = match self.values.get(name) {
            Some(v) => spec.coerce(v.clone()),
            None => spec.default_value(),
        };
        Some(value)
    }

    pub fn int(&self, name: &str) -> i64 {
        self.resolve(name).and_then(|v| v.as_int()).unwrap_or(0)
    }

    pub fn float(&self, name: &str) -> f64 {
        self.resolve(name).and_then(|v| v.as_float()).unwrap_or(0.0)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.resolve(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn choice(&self, name: &str) -> String {
        self.resolve(name)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Fixed, ordered catalog of operations.
///
/// Iteration order is registration order; it drives the add-operation menu
/// and never changes at runtime.
pub struct OperationRegistry {
    ops: Vec<OperationDefinition>,
    index: HashMap<&'static str, usize>,
}

impl OperationRegistry {
    /// Compose a registry from an explicit list of definitions.
    ///
    /// Later duplicates of a kind are ignored; the first registration wins.
    pub fn with_ops(ops: Vec<OperationDefinition>) -> Self {
        let mut index = HashMap::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            index.entry(op.kind).or_insert(i);
        }
        Self { ops, index }
    }

    /// The built-in catalog backed by the vision module.
    pub fn builtin() -> Self {
        Self::with_ops(crate::vision::definitions())
    }

    pub fn lookup(&self, kind: &str) -> Option<&OperationDefinition> {
        self.index.get(kind).map(|&i| &self.ops[i])
    }

    /// All definitions in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
