//! Error handling for the ImageLab application.
//!
//! Subsystem errors ([`crate::pipeline::PipelineError`]) convert into the
//! app-level [`ImageLabError`] at the boundary; everything the UI surfaces
//! goes through the status bar rather than unwinding.

use thiserror::Error;

/// Main error type for ImageLab operations.
#[derive(Error, Debug)]
pub enum ImageLabError {
    /// Errors raised inside the pipeline core.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    /// Errors from the image codec boundary (decode/encode).
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Errors talking to the system clipboard.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Errors loading or saving application state.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors communicating with the I/O worker.
    #[error("channel error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ImageLab operations.
pub type Result<T> = std::result::Result<T, ImageLabError>;
