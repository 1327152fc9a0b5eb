//! Pipeline editor panel — the ordered list of steps.
//!
//! Each step renders as a small card: enabled checkbox, move/remove
//! controls, and schema-driven parameter widgets. The panel never mutates
//! the model; every edit comes back as an [`AppAction`] and flows through
//! the model's coercion funnel.

use crate::frontend::state::AppAction;
use crate::pipeline::{MoveDirection, PipelineModel, PipelineStep, StepChange};
use crate::registry::{OperationRegistry, ParamKind, ParamSpec, ParamValue};
use egui::{Color32, RichText, Ui};

/// Context needed to render the pipeline panel.
pub struct PipelinePanelContext<'a> {
    pub model: &'a PipelineModel,
    pub registry: &'a OperationRegistry,
}

/// Render the panel; returns the edits made this frame.
pub fn render_pipeline_panel(ui: &mut Ui, ctx: &PipelinePanelContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.heading("Pipeline");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.menu_button("➕ Add", |ui| {
                for op in ctx.registry.kinds() {
                    if ui.button(op.label).clicked() {
                        actions.push(AppAction::AddStep(op.kind.to_string()));
                        ui.close();
                    }
                }
            });
        });
    });
    ui.separator();

    if ctx.model.is_empty() {
        ui.label(RichText::new("No operations. Add one to begin.").weak());
        return actions;
    }

    let count = ctx.model.len();
    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for (index, step) in ctx.model.steps().iter().enumerate() {
                ui.push_id(step.id.raw(), |ui| {
                    render_step_card(ui, ctx, step, index, count, &mut actions);
                });
                ui.add_space(4.0);
            }
        });

    actions
}

fn render_step_card(
    ui: &mut Ui,
    ctx: &PipelinePanelContext<'_>,
    step: &PipelineStep,
    index: usize,
    count: usize,
    actions: &mut Vec<AppAction>,
) {
    let def = ctx.registry.lookup(&step.kind);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            let mut enabled = step.enabled;
            if ui.checkbox(&mut enabled, "").changed() {
                actions.push(AppAction::UpdateStep(step.id, StepChange::enable(enabled)));
            }

            match def {
                Some(def) => {
                    ui.label(RichText::new(def.label).strong());
                }
                None => {
                    ui.label(RichText::new(&step.kind).strong().color(Color32::LIGHT_RED))
                        .on_hover_text("Unknown operation: kept in the pipeline, skipped when running");
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Remove").clicked() {
                    actions.push(AppAction::RemoveStep(step.id));
                }
                if ui
                    .add_enabled(index + 1 < count, egui::Button::new("⬇"))
                    .clicked()
                {
                    actions.push(AppAction::MoveStep(step.id, MoveDirection::Down));
                }
                if ui.add_enabled(index > 0, egui::Button::new("⬆")).clicked() {
                    actions.push(AppAction::MoveStep(step.id, MoveDirection::Up));
                }
            });
        });

        if let Some(def) = def {
            if !def.params.is_empty() {
                ui.add_enabled_ui(step.enabled, |ui| {
                    for spec in def.params {
                        render_param_widget(ui, step, spec, actions);
                    }
                });
            }
        }
    });
}

fn render_param_widget(
    ui: &mut Ui,
    step: &PipelineStep,
    spec: &'static ParamSpec,
    actions: &mut Vec<AppAction>,
) {
    let current = step
        .params
        .get(spec.name)
        .cloned()
        .unwrap_or_else(|| spec.default_value());

    match spec.kind {
        ParamKind::Int { min, max, .. } => {
            let mut value = current.as_int().unwrap_or(min);
            let slider = egui::Slider::new(&mut value, min..=max).text(spec.label);
            if ui.add(slider).changed() {
                // Odd coercion happens in the model update, so the widget can
                // stay a plain integer slider.
                actions.push(AppAction::UpdateStep(
                    step.id,
                    StepChange::param(spec.name, ParamValue::Int(value)),
                ));
            }
        }
        ParamKind::Float { min, max } => {
            let mut value = current.as_float().unwrap_or(min);
            let slider = egui::Slider::new(&mut value, min..=max).text(spec.label);
            if ui.add(slider).changed() {
                actions.push(AppAction::UpdateStep(
                    step.id,
                    StepChange::param(spec.name, ParamValue::Float(value)),
                ));
            }
        }
        ParamKind::Bool => {
            let mut value = current.as_bool().unwrap_or(false);
            if ui.checkbox(&mut value, spec.label).changed() {
                actions.push(AppAction::UpdateStep(
                    step.id,
                    StepChange::param(spec.name, ParamValue::Bool(value)),
                ));
            }
        }
        ParamKind::Choice { choices } => {
            let selected = current.as_str().unwrap_or("").to_string();
            egui::ComboBox::from_id_salt((step.id.raw(), spec.name))
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for &choice in choices {
                        if ui
                            .selectable_label(selected == choice, choice)
                            .clicked()
                        {
                            actions.push(AppAction::UpdateStep(
                                step.id,
                                StepChange::param(spec.name, ParamValue::Choice(choice.to_string())),
                            ));
                        }
                    }
                });
        }
    }
}
