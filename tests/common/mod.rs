//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use image::{Rgba, RgbaImage};

/// Uniform mid-gray test image.
pub fn gray_image(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))
}

/// Black/white checkerboard with the given cell size.
pub fn checkerboard(w: u32, h: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

/// Assert two rasters are pixel-identical.
pub fn assert_pixels_eq(a: &RgbaImage, b: &RgbaImage) {
    assert_eq!(a.dimensions(), b.dimensions(), "dimension mismatch");
    assert_eq!(a.as_raw(), b.as_raw(), "pixel data differs");
}
