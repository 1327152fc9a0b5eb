//! The pipeline core: ordered-operation model, execution engine, buffer
//! lifetime, and debounced scheduling.
//!
//! ```text
//! edits ──► PipelineModel ──► RunScheduler (debounce) ──► Executor
//!                                                            │
//!                    OperationRegistry ◄── lookup per step ──┤
//!                                                            ▼
//!                                               PreviewSnapshot ──► compare view
//! ```
//!
//! # Design
//!
//! - **Strict sequence** — steps run in pipeline order, each consuming the
//!   previous step's output; there is no parallel step execution.
//! - **Type-level buffer ownership** — working buffers are [`Frame`]s whose
//!   release is bound to scope, observable through the [`AllocationLedger`].
//! - **Drop, don't queue** — a run requested mid-run is discarded; the
//!   debounce deadline is the only scheduling primitive.
//! - **Tolerant execution** — unknown step kinds are skipped, transform
//!   failures abort the run but never the application.

pub mod error;
pub mod executor;
pub mod frame;
pub mod id;
pub mod model;
pub mod scheduler;

pub use error::{PipelineError, PipelineResult};
pub use executor::{Executor, RunReport, RunStatus};
pub use frame::{AllocationLedger, Frame};
pub use id::{StepId, StepIdGen};
pub use model::{MoveDirection, PipelineModel, PipelineStep, StepChange, StepSnapshot};
pub use scheduler::{RunScheduler, DEFAULT_DEBOUNCE};
