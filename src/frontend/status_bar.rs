//! Status bar panel — bottom bar showing the last run summary and errors.

use crate::pipeline::RunReport;
use egui::{Color32, RichText, Ui};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub report: Option<&'a RunReport>,
    /// Dimensions of the loaded image, if any.
    pub image_dims: Option<(u32, u32)>,
    /// A debounced run is waiting to fire.
    pub run_pending: bool,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Run status dot ===
        let (color, text) = match ctx.report {
            Some(report) if report.success => (Color32::GREEN, "OK"),
            Some(_) => (Color32::RED, "Failed"),
            None => (Color32::GRAY, "Idle"),
        };
        ui.colored_label(color, "●");
        ui.label(RichText::new(text).small());

        if let Some(report) = ctx.report {
            ui.separator();
            let steps = if report.steps_skipped > 0 {
                format!(
                    "Steps: {} ({} skipped)",
                    report.steps_executed, report.steps_skipped
                )
            } else {
                format!("Steps: {}", report.steps_executed)
            };
            ui.label(RichText::new(steps).small());

            ui.separator();
            ui.label(RichText::new(format!("{:.1} ms", report.duration.as_secs_f64() * 1000.0)).small());
        }

        if let Some((w, h)) = ctx.image_dims {
            ui.separator();
            ui.label(RichText::new(format!("{w}×{h}")).small());
        }

        if ctx.run_pending {
            ui.separator();
            ui.label(RichText::new("pending…").small().weak());
        }

        // === Error message (right-aligned) ===
        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
