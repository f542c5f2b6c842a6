//! Error types for schedule computation.

use thiserror::Error;

/// Errors that can abort a scheduling run.
///
/// Every variant carries the names needed to explain the failure to a user.
/// No partial schedule is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Duplicate task name: {name}")]
    DuplicateTask { name: String },

    #[error("Task {task:?} depends on unknown predecessor {predecessor:?}")]
    UnknownPredecessor { task: String, predecessor: String },

    #[error("Task {task:?} declares unknown successor {successor:?}")]
    UnknownSuccessor { task: String, successor: String },

    #[error("Task {task:?} has invalid {field} duration: {value}")]
    InvalidDuration {
        task: String,
        field: &'static str,
        value: f64,
    },

    /// Every estimate is valid, but the accumulated finish time along some path is not finite.
    #[error("Earliest finish of task {task:?} overflows")]
    DurationOverflow { task: String },

    /// `cycle` lists each participant once, in dependency order.
    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Unknown critical path test: {0}")]
    UnknownCriticalPathTest(String),

    #[error("Calendar date out of range for task {task:?}")]
    DateOutOfRange { task: String },
}

fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {}", cycle.join(" -> "), first),
        None => String::new(),
    }
}
