//! Integration tests for pipeline export/import: round-trips, id repair,
//! tolerance for foreign data, and malformed-payload rejection.

mod common;

use common::builders::{test_registry, PipelineBuilder};
use imagelab_rs::registry::ParamValue;
use imagelab_rs::{PipelineModel, StepChange};
use proptest::prelude::*;

#[test]
fn test_round_trip_preserves_sequence() {
    let registry = test_registry();
    let mut model = PipelineBuilder::new(&registry)
        .step("gaussian-blur")
        .with_param("kernel", ParamValue::Int(9))
        .disabled("threshold")
        .step("flip")
        .with_param("axis", ParamValue::Choice("vertical".into()))
        .build();

    let json = model.export_json();
    let mut restored = PipelineModel::new();
    restored.import_json(&registry, &json).expect("import");

    let original: Vec<_> = model
        .steps()
        .iter()
        .map(|s| (s.kind.clone(), s.enabled, s.params.clone()))
        .collect();
    let round_tripped: Vec<_> = restored
        .steps()
        .iter()
        .map(|s| (s.kind.clone(), s.enabled, s.params.clone()))
        .collect();
    assert_eq!(original, round_tripped);

    // Numeric ids round-trip too.
    let ids_a: Vec<_> = model.steps().iter().map(|s| s.id).collect();
    let ids_b: Vec<_> = restored.steps().iter().map(|s| s.id).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn test_import_advances_id_generator_past_payload() {
    let registry = test_registry();
    let mut model = PipelineModel::new();
    model
        .import_json(
            &registry,
            r#"[{"id": 40, "kind": "invert"}, {"id": 12, "kind": "grayscale"}]"#,
        )
        .expect("import");
    let fresh = model.add(&registry, "threshold").expect("add");
    assert!(fresh.raw() > 40);
}

#[test]
fn test_import_assigns_fresh_ids_for_non_numeric() {
    let registry = test_registry();
    let mut model = PipelineModel::new();
    model
        .import_json(
            &registry,
            r#"[
                {"id": "a", "kind": "invert"},
                {"kind": "grayscale"},
                {"id": 1.5, "kind": "threshold"}
            ]"#,
        )
        .expect("import");
    assert_eq!(model.len(), 3);
    let mut ids: Vec<_> = model.steps().iter().map(|s| s.id.raw()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_import_seeds_missing_schema_params() {
    let registry = test_registry();
    let mut model = PipelineModel::new();
    model
        .import_json(&registry, r#"[{"id": 0, "kind": "threshold"}]"#)
        .expect("import");
    let step = &model.steps()[0];
    assert_eq!(step.params.get("level"), Some(&ParamValue::Int(128)));
    assert_eq!(step.params.get("invert"), Some(&ParamValue::Bool(false)));
}

#[test]
fn test_import_coerces_out_of_range_values() {
    let registry = test_registry();
    let mut model = PipelineModel::new();
    model
        .import_json(
            &registry,
            r#"[{"id": 0, "kind": "gaussian-blur", "parameters": {"kernel": 100}}]"#,
        )
        .expect("import");
    // Clamped to the schema max, which is odd already.
    assert_eq!(
        model.steps()[0].params.get("kernel"),
        Some(&ParamValue::Int(31))
    );
}

#[test]
fn test_foreign_param_keys_survive_round_trip() {
    let registry = test_registry();
    let mut model = PipelineModel::new();
    model
        .import_json(
            &registry,
            r#"[{"id": 0, "kind": "invert", "parameters": {"vendor_hint": "fast"}}]"#,
        )
        .expect("import");

    let json = model.export_json();
    assert!(json.contains("vendor_hint"));

    let mut restored = PipelineModel::new();
    restored.import_json(&registry, &json).expect("import");
    assert_eq!(
        restored.steps()[0].params.get("vendor_hint"),
        Some(&ParamValue::Choice("fast".into()))
    );
}

#[test]
fn test_malformed_payloads_leave_pipeline_unchanged() {
    let registry = test_registry();
    let mut model = PipelineBuilder::new(&registry).step("invert").build();

    for payload in [
        "not json",
        r#"{"kind": "invert"}"#,
        r#"[42]"#,
        r#"[{"enabled": true}]"#,
        r#"[{"kind": "invert"}, "trailing-junk"]"#,
    ] {
        assert!(
            model.import_json(&registry, payload).is_err(),
            "payload should be rejected: {payload}"
        );
        assert_eq!(model.len(), 1);
        assert_eq!(model.steps()[0].kind, "invert");
    }
}

proptest! {
    /// Any integer assigned to an odd-constrained kernel parameter lands on
    /// an odd value within bounds.
    #[test]
    fn prop_kernel_always_odd_and_bounded(raw in -1000i64..1000) {
        let registry = test_registry();
        let mut model = PipelineBuilder::new(&registry).step("gaussian-blur").build();
        let id = model.steps()[0].id;
        model.update(&registry, id, StepChange::param("kernel", ParamValue::Int(raw)));

        let Some(ParamValue::Int(kernel)) = model.steps()[0].params.get("kernel").cloned() else {
            panic!("kernel must stay an int");
        };
        prop_assert!(kernel % 2 == 1);
        prop_assert!((1..=31).contains(&kernel));
    }

    /// Export → import reproduces the (kind, enabled, parameters) sequence
    /// for arbitrary in-range parameter values.
    #[test]
    fn prop_round_trip_any_params(
        kernel in 1i64..=31,
        level in 0i64..=255,
        enabled in any::<bool>(),
    ) {
        let registry = test_registry();
        let mut model = PipelineBuilder::new(&registry)
            .step("gaussian-blur")
            .with_param("kernel", ParamValue::Int(kernel))
            .step("threshold")
            .with_param("level", ParamValue::Int(level))
            .build();
        let threshold_id = model.steps()[1].id;
        model.update(&registry, threshold_id, StepChange::enable(enabled));

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
        prop_assert_eq!(a, b);
    }
}
