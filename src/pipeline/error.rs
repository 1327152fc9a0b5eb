//! Pipeline-specific error types.

use thiserror::Error;

/// Errors that can occur within the pipeline system.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A run was requested before any image was loaded.
    #[error("no image loaded")]
    NoImageLoaded,

    /// A step references an operation kind missing from the registry.
    /// Recoverable: execution skips the step.
    #[error("unknown operation kind '{0}'")]
    UnknownOperation(String),

    /// A transform invocation failed. Aborts the current run; the previous
    /// preview snapshot stays on screen.
    #[error("'{kind}' failed: {message}")]
    Transform { kind: String, message: String },

    /// An import payload was not an ordered sequence of step-like records.
    /// The current pipeline is left unchanged.
    #[error("malformed pipeline data: {0}")]
    MalformedPipeline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
