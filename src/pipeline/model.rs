//! The ordered pipeline model the user edits.
//!
//! A [`PipelineModel`] is a strict sequence of [`PipelineStep`]s. Reordering
//! is the only way to change execution order. Steps keep their id across
//! reorder, toggle, and parameter edits; import preserves numeric ids found
//! in the payload and repairs the rest.
//!
//! Import is tolerant by design: unknown operation kinds are kept (and
//! skipped at run time), unknown parameter keys are preserved verbatim but
//! never read, and missing fields fall back to sensible values. Only a
//! payload that is not an ordered sequence of step-like records is rejected,
//! leaving the current pipeline untouched.

use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::id::{StepId, StepIdGen};
use crate::registry::{OperationRegistry, ParamValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One operation instance within the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineStep {
    pub id: StepId,
    /// Operation kind; resolved against the registry at run time.
    pub kind: String,
    /// Disabled steps are skipped during execution but keep their position.
    pub enabled: bool,
    /// Parameter values. Schema keys are always present; foreign keys from
    /// imported data ride along untouched.
    pub params: BTreeMap<String, ParamValue>,
}

/// Partial change merged into a step by [`PipelineModel::update`].
#[derive(Debug, Clone, Default)]
pub struct StepChange {
    pub enabled: Option<bool>,
    pub params: Vec<(String, ParamValue)>,
}

impl StepChange {
    pub fn enable(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn param(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            params: vec![(name.into(), value)],
            ..Default::default()
        }
    }
}

/// Direction for [`PipelineModel::move_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Serializable snapshot of one step (export format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub id: u64,
    pub kind: String,
    pub enabled: bool,
    pub parameters: BTreeMap<String, ParamValue>,
}

/// The ordered, mutable pipeline.
#[derive(Debug, Default)]
pub struct PipelineModel {
    steps: Vec<PipelineStep>,
    ids: StepIdGen,
}

impl PipelineModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, id: StepId) -> Option<&PipelineStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Append a new step with schema defaults and `enabled = true`.
    pub fn add(&mut self, registry: &OperationRegistry, kind: &str) -> PipelineResult<StepId> {
        let def = registry
            .lookup(kind)
            .ok_or_else(|| PipelineError::UnknownOperation(kind.to_string()))?;
        let id = self.ids.next();
        self.steps.push(PipelineStep {
            id,
            kind: def.kind.to_string(),
            enabled: true,
            params: def.default_params(),
        });
        tracing::debug!(step = %id, kind, "step added");
        Ok(id)
    }

    /// Merge a partial change into the step matching `id`.
    ///
    /// Parameter edits pass through schema coercion when the step's kind is
    /// known to the registry. Returns false (and changes nothing) for an
    /// unknown id.
    pub fn update(&mut self, registry: &OperationRegistry, id: StepId, change: StepChange) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let step = &mut self.steps[index];
        if let Some(enabled) = change.enabled {
            step.enabled = enabled;
        }
        let def = registry.lookup(&step.kind);
        for (name, value) in change.params {
            let value = match def.and_then(|d| d.param_spec(&name)) {
                Some(spec) => spec.coerce(value),
                None => value,
            };
            step.params.insert(name, value);
        }
        true
    }

    /// Delete the step matching `id`. No-op for an unknown id.
    pub fn remove(&mut self, id: StepId) -> bool {
        match self.position(id) {
            Some(index) => {
                let step = self.steps.remove(index);
                tracing::debug!(step = %step.id, kind = %step.kind, "step removed");
                true
            }
            None => false,
        }
    }

    /// Swap the step with its immediate neighbor. No-op at either boundary.
    pub fn move_step(&mut self, id: StepId, direction: MoveDirection) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        match direction {
            MoveDirection::Up if index > 0 => {
                self.steps.swap(index, index - 1);
                true
            }
            MoveDirection::Down if index + 1 < self.steps.len() => {
                self.steps.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Ordered snapshots of every step, suitable for serialization.
    pub fn export(&self) -> Vec<StepSnapshot> {
        self.steps
            .iter()
            .map(|step| StepSnapshot {
                id: step.id.raw(),
                kind: step.kind.clone(),
                enabled: step.enabled,
                parameters: step.params.clone(),
            })
            .collect()
    }

    /// The export snapshot as pretty-printed JSON (clipboard payload).
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.export()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the whole pipeline from a JSON payload.
    ///
    /// Numeric ids are preserved (first occurrence wins), everything else is
    /// assigned fresh; the id generator advances past the maximum id seen.
    /// On [`PipelineError::MalformedPipeline`] the current pipeline is left
    /// unchanged.
    pub fn import_json(&mut self, registry: &OperationRegistry, json: &str) -> PipelineResult<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PipelineError::MalformedPipeline(e.to_string()))?;
        let records = value.as_array().ok_or_else(|| {
            PipelineError::MalformedPipeline("expected an ordered sequence of steps".to_string())
        })?;

        // Validate and stage on the side; only commit when the whole payload
        // parses.
        let mut ids = self.ids.clone();
        let mut taken: HashSet<u64> = HashSet::new();
        let mut staged: Vec<(Option<StepId>, String, bool, BTreeMap<String, ParamValue>)> =
            Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                PipelineError::MalformedPipeline(format!("entry {index} is not a step record"))
            })?;
            let kind = obj
                .get("kind")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    PipelineError::MalformedPipeline(format!("entry {index} has no kind"))
                })?
                .to_string();
            let enabled = obj.get("enabled").and_then(|v| v.as_bool()).unwrap_or(true);

            let mut params = BTreeMap::new();
            if let Some(map) = obj.get("parameters").and_then(|v| v.as_object()) {
                for (name, raw) in map {
                    if let Some(value) = param_value_from_json(raw) {
                        params.insert(name.clone(), value);
                    } else {
                        tracing::debug!(param = %name, "dropping unrepresentable parameter value");
                    }
                }
            }

            // Preserve numeric ids; repair missing/non-numeric/duplicate ones.
            let id = obj
                .get("id")
                .and_then(|v| v.as_u64())
                .filter(|raw| taken.insert(*raw))
                .map(StepId);
            if let Some(id) = id {
                ids.observe(id);
            }
            staged.push((id, kind, enabled, params));
        }

        self.steps = staged
            .into_iter()
            .map(|(id, kind, enabled, mut params)| {
                let id = id.unwrap_or_else(|| ids.next());
                // Seed schema keys the payload left out and coerce the rest;
                // foreign keys stay as parsed.
                if let Some(def) = registry.lookup(&kind) {
                    for spec in def.params {
                        let value = match params.remove(spec.name) {
                            Some(v) => spec.coerce(v),
                            None => spec.default_value(),
                        };
                        params.insert(spec.name.to_string(), value);
                    }
                }
                PipelineStep {
                    id,
                    kind,
                    enabled,
                    params,
                }
            })
            .collect();
        self.ids = ids;
        tracing::info!(steps = self.steps.len(), "pipeline imported");
        Ok(())
    }
}

fn param_value_from_json(value: &serde_json::Value) -> Option<ParamValue> {
    match value {
        serde_json::Value::Bool(b) => Some(ParamValue::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(ParamValue::Int(i))
            } else {
                n.as_f64().map(ParamValue::Float)
            }
        }
        serde_json::Value::String(s) => Some(ParamValue::Choice(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> OperationRegistry {
        OperationRegistry::builtin()
    }

    #[test]
    fn test_add_seeds_defaults_and_enables() {
        let registry = registry();
        let mut model = PipelineModel::new();
        let id = model.add(&registry, "gaussian-blur").expect("add");
        let step = model.get(id).expect("step");
        assert!(step.enabled);
        assert_eq!(step.params.get("kernel"), Some(&ParamValue::Int(5)));
    }

    #[test]
    fn test_add_unknown_kind_fails() {
        let registry = registry();
        let mut model = PipelineModel::new();
        assert!(matches!(
            model.add(&registry, "nope"),
            Err(PipelineError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_update_coerces_through_schema() {
        let registry = registry();
        let mut model = PipelineModel::new();
        let id = model.add(&registry, "gaussian-blur").expect("add");
        assert!(model.update(
            &registry,
            id,
            StepChange::param("kernel", ParamValue::Int(4)),
        ));
        assert_eq!(
            model.get(id).expect("step").params.get("kernel"),
            Some(&ParamValue::Int(5))
        );
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model.add(&registry, "invert").expect("add");
        assert!(!model.update(&registry, StepId(999), StepChange::enable(false)));
        assert!(model.steps()[0].enabled);
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let registry = registry();
        let mut model = PipelineModel::new();
        let first = model.add(&registry, "grayscale").expect("add");
        let last = model.add(&registry, "invert").expect("add");
        assert!(!model.move_step(first, MoveDirection::Up));
        assert!(!model.move_step(last, MoveDirection::Down));
        assert!(model.move_step(first, MoveDirection::Down));
        assert_eq!(model.steps()[0].id, last);
    }

    #[test]
    fn test_import_preserves_ids_and_advances_generator() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model
            .import_json(
                &registry,
                r#"[{"id": 7, "kind": "invert", "enabled": true, "parameters": {}}]"#,
            )
            .expect("import");
        assert_eq!(model.steps()[0].id, StepId(7));
        let fresh = model.add(&registry, "grayscale").expect("add");
        assert!(fresh.raw() > 7);
    }

    #[test]
    fn test_import_repairs_missing_and_duplicate_ids() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model
            .import_json(
                &registry,
                r#"[
                    {"kind": "invert"},
                    {"id": "three", "kind": "grayscale"},
                    {"id": 2, "kind": "invert"},
                    {"id": 2, "kind": "grayscale"}
                ]"#,
            )
            .expect("import");
        let mut seen = HashSet::new();
        for step in model.steps() {
            assert!(seen.insert(step.id), "duplicate id {:?}", step.id);
        }
    }

    #[test]
    fn test_import_keeps_unknown_kind_and_foreign_params() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model
            .import_json(
                &registry,
                r#"[{"id": 1, "kind": "sharpen", "parameters": {"radius": 3}}]"#,
            )
            .expect("import");
        let step = &model.steps()[0];
        assert_eq!(step.kind, "sharpen");
        assert_eq!(step.params.get("radius"), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn test_import_rejects_non_sequence_and_keeps_pipeline() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model.add(&registry, "invert").expect("add");
        let err = model.import_json(&registry, r#"{"kind": "invert"}"#);
        assert!(matches!(err, Err(PipelineError::MalformedPipeline(_))));
        assert_eq!(model.len(), 1);

        let err = model.import_json(&registry, r#"[{"enabled": true}]"#);
        assert!(matches!(err, Err(PipelineError::MalformedPipeline(_))));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let registry = registry();
        let mut model = PipelineModel::new();
        model.add(&registry, "gaussian-blur").expect("add");
        let id = model.add(&registry, "threshold").expect("add");
        model.update(
            &registry,
            id,
            StepChange {
                enabled: Some(false),
                params: vec![("level".to_string(), ParamValue::Int(42))],
            },
        );

        let json = model.export_json();
        let mut restored = PipelineModel::new();
        restored.import_json(&registry, &json).expect("import");

        let a: Vec<_> = model
            .steps()
            .iter()
            .map(|s| (s.kind.clone(), s.enabled, s.params.clone()))
            .collect();
        let b: Vec<_> = restored
            .steps()
            .iter()
            .map(|s| (s.kind.clone(), s.enabled, s.params.clone()))
            .collect();
        assert_eq!(a, b);
    }
}
