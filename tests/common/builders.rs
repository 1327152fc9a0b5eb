//! Test data builders for pipelines and registries.

use imagelab_rs::registry::{
    OperationDefinition, OperationRegistry, ParamValue, ResolvedParams, RunContext, TransformError,
};
use imagelab_rs::{PipelineModel, StepChange, StepId};
use image::RgbaImage;

/// Builder for assembling a pipeline against a registry.
pub struct PipelineBuilder<'a> {
    registry: &'a OperationRegistry,
    model: PipelineModel,
    last: Option<StepId>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(registry: &'a OperationRegistry) -> Self {
        Self {
            registry,
            model: PipelineModel::new(),
            last: None,
        }
    }

    /// Append an enabled step of the given kind.
    pub fn step(mut self, kind: &str) -> Self {
        let id = self.model.add(self.registry, kind).expect("known kind");
        self.last = Some(id);
        self
    }

    /// Append a disabled step of the given kind.
    pub fn disabled(mut self, kind: &str) -> Self {
        let id = self.model.add(self.registry, kind).expect("known kind");
        self.model
            .update(self.registry, id, StepChange::enable(false));
        self.last = Some(id);
        self
    }

    /// Set a parameter on the most recently added step.
    pub fn with_param(mut self, name: &str, value: ParamValue) -> Self {
        let id = self.last.expect("a step was added");
        self.model
            .update(self.registry, id, StepChange::param(name, value));
        self
    }

    pub fn build(self) -> PipelineModel {
        self.model
    }
}

// ── Synthetic operations for engine tests ──

fn identity_transform(
    source: &RgbaImage,
    _params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    Ok(source.clone())
}

fn failing_transform(
    _source: &RgbaImage,
    _params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    Err(TransformError::new("synthetic failure"))
}

/// The built-in catalog plus two synthetic operations: `identity` (copies
/// its input) and `always-fails` (errors on every invocation).
pub fn test_registry() -> OperationRegistry {
    let mut ops = imagelab_rs::vision::definitions();
    ops.push(OperationDefinition {
        kind: "identity",
        label: "Identity",
        params: &[],
        transform: identity_transform,
    });
    ops.push(OperationDefinition {
        kind: "always-fails",
        label: "Always Fails",
        params: &[],
        transform: failing_transform,
    });
    OperationRegistry::with_ops(ops)
}
