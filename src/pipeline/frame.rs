//! Working-buffer ownership for pipeline runs.
//!
//! A [`Frame`] is an owned RGBA8 raster with scope-bound lifetime: whoever
//! holds the value owns the buffer, and release happens exactly once when it
//! drops — on the success path, the error path, or an early return alike.
//! Transforms never see a `Frame`; they borrow the underlying raster and
//! return a freshly allocated one, so they cannot release a buffer they do
//! not own.
//!
//! The [`AllocationLedger`] makes the discipline observable: it counts frame
//! creations, releases, and the peak number of simultaneously live frames.
//! A leak or double release shows up as an unbalanced ledger in tests rather
//! than a runtime condition.

use image::RgbaImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct LedgerInner {
    created: AtomicUsize,
    released: AtomicUsize,
    live: AtomicUsize,
    peak_live: AtomicUsize,
}

/// Shared counters tracking frame lifetimes across one or more runs.
#[derive(Debug, Default, Clone)]
pub struct AllocationLedger {
    inner: Arc<LedgerInner>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_create(&self) {
        self.inner.created.fetch_add(1, Ordering::Relaxed);
        let live = self.inner.live.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.peak_live.fetch_max(live, Ordering::Relaxed);
    }

    fn record_release(&self) {
        self.inner.released.fetch_add(1, Ordering::Relaxed);
        self.inner.live.fetch_sub(1, Ordering::Relaxed);
    }

    /// Total frames created since the ledger was made.
    pub fn created(&self) -> usize {
        self.inner.created.load(Ordering::Relaxed)
    }

    /// Total frames released since the ledger was made.
    pub fn released(&self) -> usize {
        self.inner.released.load(Ordering::Relaxed)
    }

    /// Frames currently alive.
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::Relaxed)
    }

    /// Highest number of simultaneously live frames ever observed.
    pub fn peak_live(&self) -> usize {
        self.inner.peak_live.load(Ordering::Relaxed)
    }

    /// True when every created frame has been released.
    pub fn balanced(&self) -> bool {
        self.created() == self.released()
    }
}

/// An owned working buffer for one stage of a pipeline run.
pub struct Frame {
    pixels: RgbaImage,
    ledger: Option<AllocationLedger>,
}

impl Frame {
    /// Wrap a raster without ledger tracking.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            ledger: None,
        }
    }

    /// Wrap a raster and record its lifetime on `ledger`.
    pub fn tracked(pixels: RgbaImage, ledger: &AllocationLedger) -> Self {
        ledger.record_create();
        Self {
            pixels,
            ledger: Some(ledger.clone()),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(ledger) = &self.ledger {
            ledger.record_release();
        }
    }
}
