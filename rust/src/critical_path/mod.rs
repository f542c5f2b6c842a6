//! CPM schedule calculation.
//!
//! Runs the forward pass over the dependency graph, optionally the backward
//! pass, and selects critical tasks with the configured test.

mod calculation;
mod types;

pub use calculation::{extract_critical_path, forward_pass, schedule, ForwardPassResult};
pub use types::{Schedule, TaskTiming};
