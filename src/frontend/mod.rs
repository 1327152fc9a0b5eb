//! Frontend module for the egui UI.
//!
//! The application is three fixed panels around a central preview surface:
//!
//! - **Toolbar** (top) — image open/export, run controls, pipeline clipboard.
//! - **Pipeline panel** (left) — the ordered step editor.
//! - **Status bar** (bottom) — last run summary and errors.
//! - **Preview** (center) — compare view drawn from the cached snapshot.
//!
//! Panels return [`AppAction`]s; [`ImageLabApp`] applies them at the end of
//! each frame, so every mutation of the model, scheduler, and executor goes
//! through one dispatch point.

pub mod pipeline_panel;
pub mod preview;
pub mod state;
pub mod status_bar;
pub mod toolbar;

pub use preview::{plan_compare, CompareMode, CompareState, Layer, PreviewPane, RenderPlan};
pub use state::AppAction;

use crate::config::AppState;
use crate::io::{default_export_name, ExportFormat, IoBridge, IoEvent};
use crate::pipeline::{Executor, PipelineModel, RunScheduler, RunStatus};
use crate::registry::OperationRegistry;
use image::RgbaImage;
use pipeline_panel::PipelinePanelContext;
use status_bar::StatusBarContext;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use toolbar::ToolbarContext;

/// Main application state.
pub struct ImageLabApp {
    registry: OperationRegistry,
    model: PipelineModel,
    executor: Executor,
    scheduler: RunScheduler,
    io: IoBridge,
    app_state: AppState,

    /// The loaded, unprocessed image. Exclusively owned here; shared
    /// read-only with the engine and the preview textures.
    original: Option<RgbaImage>,
    original_path: Option<PathBuf>,

    compare: CompareState,
    preview: PreviewPane,
    last_error: Option<String>,
}

impl ImageLabApp {
    pub fn new(cc: &eframe::CreationContext<'_>, io: IoBridge, app_state: AppState) -> Self {
        if app_state.ui_preferences.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let scheduler = RunScheduler::new(
            Duration::from_millis(app_state.ui_preferences.debounce_ms.max(1)),
            app_state.ui_preferences.live_mode,
        );

        Self {
            registry: OperationRegistry::builtin(),
            model: PipelineModel::new(),
            executor: Executor::new(),
            scheduler,
            io,
            app_state,
            original: None,
            original_path: None,
            compare: CompareState::default(),
            preview: PreviewPane::default(),
            last_error: None,
        }
    }

    /// Execute the pipeline now and refresh the processed texture on
    /// success. Called only from scheduler polling.
    fn run_now(&mut self, ctx: &egui::Context) {
        let status = self
            .executor
            .run(self.original.as_ref(), &self.model, &self.registry);
        match status {
            RunStatus::Completed(report) => {
                if report.success {
                    self.last_error = None;
                    if let Some(snapshot) = self.executor.snapshot() {
                        self.preview.set_processed(ctx, snapshot);
                    }
                } else {
                    self.last_error = report.error.clone();
                }
            }
            RunStatus::Dropped => {}
        }
    }

    fn drain_io_events(&mut self, ctx: &egui::Context) {
        for event in self.io.drain_events() {
            match event {
                IoEvent::Decoded { path, image } => {
                    self.preview.clear();
                    self.preview.set_original(ctx, &image);
                    self.executor.clear_snapshot();
                    self.original = Some(image);
                    self.app_state.add_recent_image(&path);
                    self.original_path = Some(path);
                    self.last_error = None;
                    // Fresh image: bring the preview up to date right away.
                    self.scheduler.request_immediate();
                }
                IoEvent::DecodeFailed { path, error } => {
                    self.last_error = Some(format!("failed to open {}: {error}", path.display()));
                }
                IoEvent::Encoded { path } => {
                    tracing::info!(path = %path.display(), "snapshot exported");
                }
                IoEvent::EncodeFailed { path, error } => {
                    self.last_error = Some(format!("failed to save {}: {error}", path.display()));
                }
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<AppAction>) {
        for action in actions {
            match action {
                AppAction::AddStep(kind) => match self.model.add(&self.registry, &kind) {
                    Ok(_) => self.scheduler.request(),
                    Err(e) => self.last_error = Some(e.to_string()),
                },
                AppAction::UpdateStep(id, change) => {
                    if self.model.update(&self.registry, id, change) {
                        self.scheduler.request();
                    }
                }
                AppAction::RemoveStep(id) => {
                    if self.model.remove(id) {
                        self.scheduler.request();
                    }
                }
                AppAction::MoveStep(id, direction) => {
                    if self.model.move_step(id, direction) {
                        self.scheduler.request();
                    }
                }
                AppAction::RunPipeline => self.scheduler.request_immediate(),
                AppAction::SetLiveMode(live) => {
                    self.scheduler.set_live(live);
                    self.app_state.ui_preferences.live_mode = live;
                }
                AppAction::OpenImageDialog => self.open_image_dialog(),
                AppAction::LoadImage(path) => self.io.request_decode(path),
                AppAction::ExportSnapshot(format) => self.export_snapshot(format),
                AppAction::CopyPipeline => self.copy_pipeline(),
                AppAction::PastePipeline => self.paste_pipeline(),
            }
        }
    }

    fn open_image_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter(
            "Images",
            &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"],
        );
        if let Some(dir) = self
            .original_path
            .as_ref()
            .and_then(|p| p.parent().map(PathBuf::from))
        {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.io.request_decode(path);
        }
    }

    fn export_snapshot(&mut self, format: ExportFormat) {
        let Some(snapshot) = self.executor.snapshot() else {
            self.last_error = Some("nothing to export: run the pipeline first".to_string());
            return;
        };
        let dialog = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(default_export_name(format));
        if let Some(path) = dialog.save_file() {
            self.io.request_encode(path, snapshot.clone(), format);
        }
    }

    fn copy_pipeline(&mut self) {
        let json = self.model.export_json();
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(json)) {
            Ok(()) => tracing::info!(steps = self.model.len(), "pipeline copied to clipboard"),
            Err(e) => self.last_error = Some(format!("clipboard error: {e}")),
        }
    }

    fn paste_pipeline(&mut self) {
        let text = match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
            Ok(text) => text,
            Err(e) => {
                self.last_error = Some(format!("clipboard error: {e}"));
                return;
            }
        };
        match self.model.import_json(&self.registry, &text) {
            Ok(()) => {
                self.last_error = None;
                self.scheduler.request_immediate();
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }
}

impl eframe::App for ImageLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_io_events(ctx);

        // Debounce: fire at most one run per settled deadline, and keep the
        // frame clock alive until the deadline passes.
        let now = Instant::now();
        if self.scheduler.poll(now) {
            self.run_now(ctx);
        } else if let Some(remaining) = self.scheduler.time_until_fire(now) {
            ctx.request_repaint_after(remaining);
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let recents: Vec<PathBuf> = self
                .app_state
                .recent_images
                .iter()
                .map(|r| r.path.clone())
                .collect();
            let image_name = self
                .original_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string());
            let toolbar_ctx = ToolbarContext {
                has_image: self.original.is_some(),
                has_snapshot: self.executor.snapshot().is_some(),
                live_mode: self.scheduler.live(),
                recent_images: &recents,
                image_name: image_name.as_deref(),
            };
            actions.extend(toolbar::render_toolbar(ui, &toolbar_ctx));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status_ctx = StatusBarContext {
                report: self.executor.last_report(),
                image_dims: self.original.as_ref().map(|img| img.dimensions()),
                run_pending: self.scheduler.pending(),
                last_error: self.last_error.as_deref(),
            };
            status_bar::render_status_bar(ui, &status_ctx);
        });

        egui::SidePanel::left("pipeline_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                let panel_ctx = PipelinePanelContext {
                    model: &self.model,
                    registry: &self.registry,
                };
                actions.extend(pipeline_panel::render_pipeline_panel(ui, &panel_ctx));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.preview.ui(ui, &mut self.compare);
        });

        self.apply_actions(actions);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.io.shutdown();
        if let Err(e) = self.app_state.save() {
            tracing::warn!("failed to save app state: {e}");
        }
    }
}
