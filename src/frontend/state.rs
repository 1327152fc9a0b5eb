//! Shared frontend types.
//!
//! Panels receive read-only context structs and return `AppAction`s instead
//! of mutating application state directly; the app applies them at the end
//! of the frame. This keeps panel logic testable and the mutation sites in
//! one place.

use crate::io::ExportFormat;
use crate::pipeline::{MoveDirection, StepChange, StepId};
use std::path::PathBuf;

/// Actions any panel can emit.
#[derive(Debug, Clone)]
pub enum AppAction {
    // Pipeline edits
    /// Append a step of the given registry kind.
    AddStep(String),
    /// Merge a partial change into a step.
    UpdateStep(StepId, StepChange),
    /// Delete a step.
    RemoveStep(StepId),
    /// Swap a step with its neighbor.
    MoveStep(StepId, MoveDirection),

    // Execution
    /// Manual run trigger (works with live mode off).
    RunPipeline,
    /// Toggle debounced automatic re-runs.
    SetLiveMode(bool),

    // Image I/O
    /// Ask the user for an image file, then decode it.
    OpenImageDialog,
    /// Decode a specific file (recents menu).
    LoadImage(PathBuf),
    /// Ask for a destination, then encode the preview snapshot.
    ExportSnapshot(ExportFormat),

    // Pipeline clipboard
    CopyPipeline,
    PastePipeline,
}
