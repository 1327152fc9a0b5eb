//! Vision backend — built-in operations over the `image` crate.
//!
//! This module is the only place that touches pixel algorithms. Every
//! function here conforms to the registry's transform contract: borrow the
//! source raster, return one freshly allocated RGBA8 raster, keep any
//! internal intermediate inside the call. Operations the `image` crate
//! provides directly (blur, brighten, contrast, hue rotation, flips,
//! resizing) are delegated; the few it lacks (threshold, source blending)
//! are small per-pixel loops that convert back to RGBA8 before returning.
//!
//! Swapping in a different backend means replacing [`definitions`] and
//! nothing else — the engine never names a concrete operation.

use crate::registry::{
    DefaultValue, OperationDefinition, ParamKind, ParamSpec, ResolvedParams, RunContext,
    TransformError,
};
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

/// All built-in operations, in the order they appear in the add menu.
pub fn definitions() -> Vec<OperationDefinition> {
    vec![
        OperationDefinition {
            kind: "grayscale",
            label: "Grayscale",
            params: &[],
            transform: grayscale,
        },
        OperationDefinition {
            kind: "invert",
            label: "Invert",
            params: &[],
            transform: invert,
        },
        OperationDefinition {
            kind: "gaussian-blur",
            label: "Gaussian Blur",
            params: GAUSSIAN_BLUR_PARAMS,
            transform: gaussian_blur,
        },
        OperationDefinition {
            kind: "threshold",
            label: "Threshold",
            params: THRESHOLD_PARAMS,
            transform: threshold,
        },
        OperationDefinition {
            kind: "brightness",
            label: "Brightness",
            params: BRIGHTNESS_PARAMS,
            transform: brightness,
        },
        OperationDefinition {
            kind: "contrast",
            label: "Contrast",
            params: CONTRAST_PARAMS,
            transform: contrast,
        },
        OperationDefinition {
            kind: "hue-rotate",
            label: "Hue Rotate",
            params: HUE_ROTATE_PARAMS,
            transform: hue_rotate,
        },
        OperationDefinition {
            kind: "pixelate",
            label: "Pixelate",
            params: PIXELATE_PARAMS,
            transform: pixelate,
        },
        OperationDefinition {
            kind: "flip",
            label: "Flip",
            params: FLIP_PARAMS,
            transform: flip,
        },
        OperationDefinition {
            kind: "blend-original",
            label: "Blend Original",
            params: BLEND_ORIGINAL_PARAMS,
            transform: blend_original,
        },
    ]
}

// ── Parameter schemas ──

const GAUSSIAN_BLUR_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "kernel",
    label: "Kernel size",
    kind: ParamKind::Int {
        min: 1,
        max: 31,
        step: 1,
    },
    default: DefaultValue::Int(5),
    odd: true,
}];

const THRESHOLD_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "level",
        label: "Level",
        kind: ParamKind::Int {
            min: 0,
            max: 255,
            step: 1,
        },
        default: DefaultValue::Int(128),
        odd: false,
    },
    ParamSpec {
        name: "invert",
        label: "Invert",
        kind: ParamKind::Bool,
        default: DefaultValue::Bool(false),
        odd: false,
    },
];

const BRIGHTNESS_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "amount",
    label: "Amount",
    kind: ParamKind::Int {
        min: -255,
        max: 255,
        step: 1,
    },
    default: DefaultValue::Int(25),
    odd: false,
}];

const CONTRAST_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "amount",
    label: "Amount",
    kind: ParamKind::Float {
        min: -100.0,
        max: 100.0,
    },
    default: DefaultValue::Float(25.0),
    odd: false,
}];

const HUE_ROTATE_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "degrees",
    label: "Degrees",
    kind: ParamKind::Int {
        min: -180,
        max: 180,
        step: 1,
    },
    default: DefaultValue::Int(90),
    odd: false,
}];

const PIXELATE_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "block",
    label: "Block size",
    kind: ParamKind::Int {
        min: 2,
        max: 64,
        step: 1,
    },
    default: DefaultValue::Int(8),
    odd: false,
}];

const FLIP_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "axis",
    label: "Axis",
    kind: ParamKind::Choice {
        choices: &["horizontal", "vertical"],
    },
    default: DefaultValue::Choice("horizontal"),
    odd: false,
}];

const BLEND_ORIGINAL_PARAMS: &[ParamSpec] = &[ParamSpec {
    name: "opacity",
    label: "Opacity",
    kind: ParamKind::Float { min: 0.0, max: 1.0 },
    default: DefaultValue::Float(0.5),
    odd: false,
}];

// ── Transforms ──

fn grayscale(
    source: &RgbaImage,
    _params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    let mut out = RgbaImage::new(source.width(), source.height());
    for (dst, src) in out.pixels_mut().zip(source.pixels()) {
        let luma = src.to_luma()[0];
        *dst = Rgba([luma, luma, luma, src[3]]);
    }
    Ok(out)
}

fn invert(
    source: &RgbaImage,
    _params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    let mut out = source.clone();
    imageops::invert(&mut out);
    Ok(out)
}

fn gaussian_blur(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    let kernel = params.int("kernel");
    // Kernel size -> sigma, same mapping OpenCV uses for an auto sigma.
    let sigma = (0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8).max(0.1);
    Ok(imageops::blur(source, sigma))
}

fn threshold(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    let level = params.int("level") as u8;
    let inverted = params.flag("invert");
    let mut out = RgbaImage::new(source.width(), source.height());
    for (dst, src) in out.pixels_mut().zip(source.pixels()) {
        let above = src.to_luma()[0] >= level;
        let v = if above != inverted { 255 } else { 0 };
        *dst = Rgba([v, v, v, src[3]]);
    }
    Ok(out)
}

fn brightness(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    Ok(imageops::brighten(source, params.int("amount") as i32))
}

fn contrast(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    Ok(imageops::contrast(source, params.float("amount") as f32))
}

fn hue_rotate(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    Ok(imageops::huerotate(source, params.int("degrees") as i32))
}

fn pixelate(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    let block = params.int("block").max(2) as u32;
    let (w, h) = source.dimensions();
    let dw = (w / block).max(1);
    let dh = (h / block).max(1);
    let small = imageops::resize(source, dw, dh, FilterType::Nearest);
    Ok(imageops::resize(&small, w, h, FilterType::Nearest))
}

fn flip(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    _ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    match params.choice("axis").as_str() {
        "vertical" => Ok(imageops::flip_vertical(source)),
        _ => Ok(imageops::flip_horizontal(source)),
    }
}

fn blend_original(
    source: &RgbaImage,
    params: &ResolvedParams<'_>,
    ctx: &RunContext<'_>,
) -> Result<RgbaImage, TransformError> {
    if ctx.original.dimensions() != source.dimensions() {
        return Err(TransformError::new(format!(
            "original {}x{} does not match working buffer {}x{}",
            ctx.original.width(),
            ctx.original.height(),
            source.width(),
            source.height()
        )));
    }
    let t = params.float("opacity") as f32;
    let mut out = RgbaImage::new(source.width(), source.height());
    for ((dst, src), orig) in out.pixels_mut().zip(source.pixels()).zip(ctx.original.pixels()) {
        let mut px = [0u8; 4];
        for c in 0..4 {
            let a = orig[c] as f32;
            let b = src[c] as f32;
            px[c] = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
        }
        *dst = Rgba(px);
    }
    Ok(out)
}
