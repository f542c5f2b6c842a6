//! Rust implementation of CPM/PERT project scheduling.
//!
//! Turns three-point task estimates and dependency declarations into earliest
//! start/finish times and a critical path. Usable as a Rust library or as the
//! `cpm_pert.rust` Python extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

pub mod backward_pass;
pub mod calendar;
mod config;
pub mod critical_path;
mod error;
pub mod estimate;
pub mod graph;
mod interner;
pub mod logging;
mod models;

pub use backward_pass::{backward_pass, BackwardPassResult};
pub use calendar::project_onto_calendar;
pub use config::{CriticalPathTest, ScheduleConfig};
pub use critical_path::{schedule, Schedule, TaskTiming};
pub use error::ScheduleError;
pub use estimate::{expected_duration, ThreePointEstimate};
pub use graph::DependencyGraph;
pub use interner::TaskIdx;
pub use models::{ScheduleResult, ScheduledTask, Task};

pyo3::create_exception!(rust, DuplicateTaskError, PyValueError);
pyo3::create_exception!(rust, UnknownPredecessorError, PyValueError);
pyo3::create_exception!(rust, UnknownSuccessorError, PyValueError);
pyo3::create_exception!(rust, CyclicDependencyError, PyValueError);
pyo3::create_exception!(rust, InvalidDurationError, PyValueError);
pyo3::create_exception!(rust, DurationOverflowError, PyValueError);
pyo3::create_exception!(rust, UnknownCriticalPathTestError, PyValueError);
pyo3::create_exception!(rust, DateOutOfRangeError, PyValueError);

/// Map each failure kind to its own Python exception class.
fn to_py_err(err: ScheduleError) -> PyErr {
    let message = err.to_string();
    match err {
        ScheduleError::DuplicateTask { .. } => DuplicateTaskError::new_err(message),
        ScheduleError::UnknownPredecessor { .. } => UnknownPredecessorError::new_err(message),
        ScheduleError::UnknownSuccessor { .. } => UnknownSuccessorError::new_err(message),
        ScheduleError::CyclicDependency { .. } => CyclicDependencyError::new_err(message),
        ScheduleError::InvalidDuration { .. } => InvalidDurationError::new_err(message),
        ScheduleError::DurationOverflow { .. } => DurationOverflowError::new_err(message),
        ScheduleError::UnknownCriticalPathTest(_) => {
            UnknownCriticalPathTestError::new_err(message)
        }
        ScheduleError::DateOutOfRange { .. } => DateOutOfRangeError::new_err(message),
    }
}

/// Convert an engine schedule to the Python-facing result type.
fn to_schedule_result(
    schedule: &Schedule,
    config: &ScheduleConfig,
) -> Result<ScheduleResult, ScheduleError> {
    let earliest_start: HashMap<String, f64> = schedule
        .timings
        .iter()
        .map(|t| (t.task_id.clone(), t.earliest_start))
        .collect();
    let expected_durations: HashMap<String, f64> = schedule
        .timings
        .iter()
        .map(|t| (t.task_id.clone(), t.expected_duration))
        .collect();
    let slack: HashMap<String, f64> = schedule
        .timings
        .iter()
        .filter_map(|t| t.slack.map(|s| (t.task_id.clone(), s)))
        .collect();

    let scheduled_tasks = match config.project_start {
        Some(start) => project_onto_calendar(schedule, start)?,
        None => Vec::new(),
    };

    Ok(ScheduleResult {
        earliest_finish: schedule
            .earliest_finish
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect(),
        earliest_start,
        expected_durations,
        slack,
        critical_path: schedule.critical_path.clone(),
        topological_order: schedule.topological_order().map(String::from).collect(),
        project_duration: schedule.project_duration,
        critical_path_variance: schedule.critical_path_variance,
        scheduled_tasks,
    })
}

/// Compute the CPM/PERT schedule for a list of tasks.
///
/// # Arguments
/// * `tasks` - Tasks with unique names, estimates and dependencies
/// * `config` - Optional configuration (critical path test, verbosity, project start)
///
/// # Returns
/// * ScheduleResult with earliest start/finish times and the critical path
///
/// # Raises
/// * DuplicateTaskError, UnknownPredecessorError, UnknownSuccessorError,
///   InvalidDurationError or CyclicDependencyError for malformed input
/// * DurationOverflowError if finish times overflow
/// * UnknownCriticalPathTestError or DateOutOfRangeError for bad configuration
///
/// All of these subclass ValueError.
#[pyfunction]
#[pyo3(signature = (tasks, config=None))]
fn run_schedule(tasks: Vec<Task>, config: Option<ScheduleConfig>) -> PyResult<ScheduleResult> {
    let config = config.unwrap_or_default();
    schedule(&tasks, &config)
        .and_then(|result| to_schedule_result(&result, &config))
        .map_err(to_py_err)
}

/// PERT expected duration `(o + 4m + p) / 6`.
#[pyfunction]
#[pyo3(name = "expected_duration", signature = (optimistic=0.0, most_likely=0.0, pessimistic=0.0))]
fn py_expected_duration(optimistic: f64, most_likely: f64, pessimistic: f64) -> f64 {
    expected_duration(optimistic, most_likely, pessimistic)
}

/// The cpm_pert.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<ScheduledTask>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<ScheduleConfig>()?;

    // Errors
    let py = m.py();
    m.add("DuplicateTaskError", py.get_type_bound::<DuplicateTaskError>())?;
    m.add(
        "UnknownPredecessorError",
        py.get_type_bound::<UnknownPredecessorError>(),
    )?;
    m.add(
        "UnknownSuccessorError",
        py.get_type_bound::<UnknownSuccessorError>(),
    )?;
    m.add(
        "CyclicDependencyError",
        py.get_type_bound::<CyclicDependencyError>(),
    )?;
    m.add(
        "InvalidDurationError",
        py.get_type_bound::<InvalidDurationError>(),
    )?;
    m.add(
        "DurationOverflowError",
        py.get_type_bound::<DurationOverflowError>(),
    )?;
    m.add(
        "UnknownCriticalPathTestError",
        py.get_type_bound::<UnknownCriticalPathTestError>(),
    )?;
    m.add(
        "DateOutOfRangeError",
        py.get_type_bound::<DateOutOfRangeError>(),
    )?;

    // Algorithms
    m.add_function(wrap_pyfunction!(run_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_expected_duration, m)?)?;

    Ok(())
}
