//! Toolbar panel — horizontal bar with image, run, and clipboard controls.
//!
//! Sits above the pipeline/preview area.

use crate::frontend::state::AppAction;
use crate::io::ExportFormat;
use egui::{RichText, Ui};
use std::path::PathBuf;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub has_image: bool,
    pub has_snapshot: bool,
    pub live_mode: bool,
    pub recent_images: &'a [PathBuf],
    pub image_name: Option<&'a str>,
}

/// Render the main application toolbar.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        // === Image group ===
        if ui.button("Open…").on_hover_text("Load an image file").clicked() {
            actions.push(AppAction::OpenImageDialog);
        }
        ui.menu_button("Recent", |ui| {
            if ctx.recent_images.is_empty() {
                ui.label(RichText::new("No recent images").weak());
            }
            for path in ctx.recent_images {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                if ui.button(name).clicked() {
                    actions.push(AppAction::LoadImage(path.clone()));
                    ui.close();
                }
            }
        });
        ui.menu_button("Export", |ui| {
            for format in [ExportFormat::Png, ExportFormat::Jpeg] {
                let button = egui::Button::new(format.label());
                if ui.add_enabled(ctx.has_snapshot, button).clicked() {
                    actions.push(AppAction::ExportSnapshot(format));
                    ui.close();
                }
            }
        });

        ui.separator();

        // === Run group ===
        let run_button = egui::Button::new(RichText::new("▶ Run").strong());
        if ui
            .add_enabled(ctx.has_image, run_button)
            .on_hover_text("Run the pipeline now")
            .clicked()
        {
            actions.push(AppAction::RunPipeline);
        }
        let mut live = ctx.live_mode;
        if ui
            .checkbox(&mut live, "Live")
            .on_hover_text("Re-run automatically after edits settle")
            .changed()
        {
            actions.push(AppAction::SetLiveMode(live));
        }

        ui.separator();

        // === Pipeline clipboard group ===
        if ui
            .button("Copy pipeline")
            .on_hover_text("Copy the pipeline as JSON to the clipboard")
            .clicked()
        {
            actions.push(AppAction::CopyPipeline);
        }
        if ui
            .button("Paste pipeline")
            .on_hover_text("Replace the pipeline from clipboard JSON")
            .clicked()
        {
            actions.push(AppAction::PastePipeline);
        }

        // === Right-aligned: current image name ===
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(name) = ctx.image_name {
                ui.label(RichText::new(name).small().weak());
            }
        });
    });

    actions
}
