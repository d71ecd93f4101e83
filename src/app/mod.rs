//! Application module
//!
//! Drives a whole run, split into:
//! - `workflow`: clean, confirm and converge
//! - `sink`: applies edit batches to the manifests
//! - `confirm`: the destructive-operation prompt

mod confirm;
mod sink;
mod workflow;

pub use confirm::{AutoConfirm, Confirm, PromptConfirm};
pub use sink::PomSink;
pub use workflow::{App, Outcome};
