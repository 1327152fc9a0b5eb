//! Compare/preview renderer.
//!
//! Draws the processed snapshot against the original in one of two modes —
//! side-by-side or wipe-slider — with a momentary peek that shows the
//! unprocessed original while held. Everything here redraws from the cached
//! preview snapshot and the original texture; changing divider, mode, or
//! peek never re-invokes the execution engine.
//!
//! The decision of *what* to draw is a pure function ([`plan_compare`]) so
//! the wipe/peek contract is unit-testable without a surface.

use egui::{
    Color32, ColorImage, Pos2, Rect, RichText, Sense, Stroke, TextureHandle, TextureOptions, Ui,
};
use image::RgbaImage;

/// Compare presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    SideBySide,
    Wipe,
}

/// View state for the compare surface. Mutated directly by the pane; none
/// of it touches pipeline state.
#[derive(Debug, Clone)]
pub struct CompareState {
    pub mode: CompareMode,
    /// Divider position as a fraction of the surface width, in [0, 1].
    /// The original is shown left of the divider.
    pub divider: f32,
    /// Momentary: while true the whole surface shows the original.
    pub peek: bool,
}

impl Default for CompareState {
    fn default() -> Self {
        Self {
            mode: CompareMode::Wipe,
            divider: 0.5,
            peek: false,
        }
    }
}

/// Which cached image fills (part of) a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Original,
    Processed,
}

/// What the compare surface should draw, derived purely from view state.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Two independent surfaces, original left, processed right.
    SideBySide,
    /// One surface: `base` everywhere, then `overlay` clipped to the region
    /// left of `fraction`, then a divider line when `divider_line` is set.
    Single {
        base: Layer,
        overlay: Option<(Layer, f32)>,
        divider_line: Option<f32>,
    },
}

/// Decide what to draw. Peek wins over everything; wipe clamps the divider
/// into [0, 1].
pub fn plan_compare(state: &CompareState) -> RenderPlan {
    if state.peek {
        return RenderPlan::Single {
            base: Layer::Original,
            overlay: None,
            divider_line: None,
        };
    }
    match state.mode {
        CompareMode::SideBySide => RenderPlan::SideBySide,
        CompareMode::Wipe => {
            let fraction = state.divider.clamp(0.0, 1.0);
            RenderPlan::Single {
                base: Layer::Processed,
                overlay: Some((Layer::Original, fraction)),
                divider_line: Some(fraction),
            }
        }
    }
}

/// The central preview pane: holds the GPU textures for the original and
/// the preview snapshot and draws the compare view.
#[derive(Default)]
pub struct PreviewPane {
    original: Option<TextureHandle>,
    processed: Option<TextureHandle>,
    image_size: Option<[usize; 2]>,
}

impl PreviewPane {
    /// Upload/replace the original texture (new image loaded).
    pub fn set_original(&mut self, ctx: &egui::Context, pixels: &RgbaImage) {
        let img = color_image(pixels);
        self.image_size = Some(img.size);
        match &mut self.original {
            Some(tex) => tex.set(img, TextureOptions::LINEAR),
            None => self.original = Some(ctx.load_texture("preview-original", img, TextureOptions::LINEAR)),
        }
    }

    /// Upload/replace the processed snapshot texture (successful run).
    pub fn set_processed(&mut self, ctx: &egui::Context, pixels: &RgbaImage) {
        let img = color_image(pixels);
        match &mut self.processed {
            Some(tex) => tex.set(img, TextureOptions::LINEAR),
            None => {
                self.processed = Some(ctx.load_texture("preview-processed", img, TextureOptions::LINEAR))
            }
        }
    }

    /// Drop both textures (image replaced; snapshot no longer matches).
    pub fn clear(&mut self) {
        self.original = None;
        self.processed = None;
        self.image_size = None;
    }

    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    /// Render the pane. Mutates only view state.
    pub fn ui(&mut self, ui: &mut Ui, state: &mut CompareState) {
        // Mode strip + peek hold button.
        ui.horizontal(|ui| {
            ui.selectable_value(&mut state.mode, CompareMode::Wipe, "Wipe");
            ui.selectable_value(&mut state.mode, CompareMode::SideBySide, "Side by side");
            ui.separator();
            let peek_btn = ui.button("Peek").on_hover_text("Hold to show the original (or hold P)");
            state.peek =
                peek_btn.is_pointer_button_down_on() || ui.input(|i| i.key_down(egui::Key::P));
        });
        ui.separator();

        let (Some(original), Some(size)) = (self.original.clone(), self.image_size) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Open an image to start").weak());
            });
            return;
        };

        match plan_compare(state) {
            RenderPlan::SideBySide => {
                self.draw_side_by_side(ui, &original, size);
            }
            RenderPlan::Single {
                base,
                overlay,
                divider_line,
            } => {
                self.draw_single(ui, state, &original, size, base, overlay, divider_line);
            }
        }
    }

    fn texture_for(&self, layer: Layer, original: &TextureHandle) -> Option<TextureHandle> {
        match layer {
            Layer::Original => Some(original.clone()),
            Layer::Processed => self.processed.clone(),
        }
    }

    fn draw_side_by_side(&self, ui: &mut Ui, original: &TextureHandle, size: [usize; 2]) {
        let avail = ui.available_rect_before_wrap();
        let gap = 6.0;
        let half = Rect::from_min_size(
            avail.min,
            egui::vec2((avail.width() - gap) / 2.0, avail.height()),
        );
        let left = fit_rect(half, size);
        let right_half = half.translate(egui::vec2(half.width() + gap, 0.0));
        let right = fit_rect(right_half, size);

        let painter = ui.painter();
        painter.image(original.id(), left, full_uv(), Color32::WHITE);
        label_corner(painter, left, "Original");
        match &self.processed {
            Some(tex) => {
                painter.image(tex.id(), right, full_uv(), Color32::WHITE);
                label_corner(painter, right, "Processed");
            }
            None => {
                label_corner(painter, right, "No result yet");
            }
        }
        ui.allocate_rect(avail, Sense::hover());
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_single(
        &self,
        ui: &mut Ui,
        state: &mut CompareState,
        original: &TextureHandle,
        size: [usize; 2],
        base: Layer,
        overlay: Option<(Layer, f32)>,
        divider_line: Option<f32>,
    ) {
        let avail = ui.available_rect_before_wrap();
        let rect = fit_rect(avail, size);

        // Drag anywhere on the surface to move the divider.
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        if state.mode == CompareMode::Wipe && !state.peek {
            if let Some(pos) = response.interact_pointer_pos() {
                state.divider = ((pos.x - rect.left()) / rect.width()).clamp(0.0, 1.0);
            }
        }

        let painter = ui.painter();
        // Base layer. A wipe without a snapshot yet falls back to the
        // original so the surface is never blank.
        let base_tex = self
            .texture_for(base, original)
            .unwrap_or_else(|| original.clone());
        painter.image(base_tex.id(), rect, full_uv(), Color32::WHITE);

        if let Some((layer, fraction)) = overlay {
            if let Some(tex) = self.texture_for(layer, original) {
                let split_x = rect.left() + rect.width() * fraction;
                let clip = Rect::from_min_max(rect.min, Pos2::new(split_x, rect.max.y));
                painter
                    .with_clip_rect(clip)
                    .image(tex.id(), rect, full_uv(), Color32::WHITE);
            }
        }

        if let Some(fraction) = divider_line {
            let x = rect.left() + rect.width() * fraction;
            painter.vline(
                x,
                rect.y_range(),
                Stroke::new(2.0, Color32::from_white_alpha(200)),
            );
        }

        if state.peek {
            label_corner(painter, rect, "Original (peek)");
        }
    }
}

fn color_image(pixels: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [pixels.width() as usize, pixels.height() as usize],
        pixels.as_raw(),
    )
}

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0))
}

/// Largest rect of the image's aspect ratio centered in `avail`.
fn fit_rect(avail: Rect, size: [usize; 2]) -> Rect {
    let (iw, ih) = (size[0] as f32, size[1] as f32);
    if iw <= 0.0 || ih <= 0.0 {
        return avail;
    }
    let scale = (avail.width() / iw).min(avail.height() / ih).min(1.0);
    let dims = egui::vec2(iw * scale, ih * scale);
    Rect::from_center_size(avail.center(), dims)
}

fn label_corner(painter: &egui::Painter, rect: Rect, text: &str) {
    painter.text(
        rect.min + egui::vec2(6.0, 6.0),
        egui::Align2::LEFT_TOP,
        text,
        egui::FontId::proportional(12.0),
        Color32::from_white_alpha(220),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_divider_zero_shows_only_processed() {
        let state = CompareState {
            mode: CompareMode::Wipe,
            divider: 0.0,
            peek: false,
        };
        let RenderPlan::Single { base, overlay, .. } = plan_compare(&state) else {
            panic!("expected single surface");
        };
        assert_eq!(base, Layer::Processed);
        // Overlay clipped to zero width: nothing of the original is visible.
        assert_eq!(overlay, Some((Layer::Original, 0.0)));
    }

    #[test]
    fn test_wipe_divider_one_shows_only_original() {
        let state = CompareState {
            mode: CompareMode::Wipe,
            divider: 1.0,
            peek: false,
        };
        let RenderPlan::Single { overlay, .. } = plan_compare(&state) else {
            panic!("expected single surface");
        };
        assert_eq!(overlay, Some((Layer::Original, 1.0)));
    }

    #[test]
    fn test_peek_overrides_any_mode() {
        for mode in [CompareMode::Wipe, CompareMode::SideBySide] {
            let state = CompareState {
                mode,
                divider: 0.3,
                peek: true,
            };
            assert_eq!(
                plan_compare(&state),
                RenderPlan::Single {
                    base: Layer::Original,
                    overlay: None,
                    divider_line: None,
                }
            );
        }
    }

    #[test]
    fn test_out_of_range_divider_is_clamped() {
        let state = CompareState {
            mode: CompareMode::Wipe,
            divider: 3.5,
            peek: false,
        };
        let RenderPlan::Single { overlay, .. } = plan_compare(&state) else {
            panic!("expected single surface");
        };
        assert_eq!(overlay, Some((Layer::Original, 1.0)));
    }
}
