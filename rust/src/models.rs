//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::estimate::ThreePointEstimate;

// Note: We use std HashMap here for PyO3 interface compatibility

/// A task with a three-point duration estimate and its dependency declarations.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub optimistic_duration: f64,
    #[pyo3(get, set)]
    pub most_likely_duration: f64,
    #[pyo3(get, set)]
    pub pessimistic_duration: f64,
    /// Tasks that must finish before this one starts.
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    /// Tasks that may only start after this one finishes.
    #[pyo3(get, set)]
    pub successors: Vec<String>,
}

impl Task {
    pub fn estimate(&self) -> ThreePointEstimate {
        ThreePointEstimate {
            optimistic: self.optimistic_duration,
            most_likely: self.most_likely_duration,
            pessimistic: self.pessimistic_duration,
        }
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (
        name,
        optimistic_duration=0.0,
        most_likely_duration=0.0,
        pessimistic_duration=0.0,
        predecessors=None,
        successors=None
    ))]
    fn new(
        name: String,
        optimistic_duration: f64,
        most_likely_duration: f64,
        pessimistic_duration: f64,
        predecessors: Option<Vec<String>>,
        successors: Option<Vec<String>>,
    ) -> Self {
        Self {
            name,
            optimistic_duration,
            most_likely_duration,
            pessimistic_duration,
            predecessors: predecessors.unwrap_or_default(),
            successors: successors.unwrap_or_default(),
        }
    }

    #[getter]
    fn expected_duration(&self) -> f64 {
        self.estimate().expected()
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(name={:?}, estimate=({}, {}, {}), preds={}, succs={})",
            self.name,
            self.optimistic_duration,
            self.most_likely_duration,
            self.pessimistic_duration,
            self.predecessors.len(),
            self.successors.len()
        )
    }
}

/// A task projected onto calendar days.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    #[pyo3(get, set)]
    pub task_id: String,
    #[pyo3(get, set)]
    pub start_date: NaiveDate,
    #[pyo3(get, set)]
    pub end_date: NaiveDate,
    #[pyo3(get, set)]
    pub duration_days: f64,
}

#[pymethods]
impl ScheduledTask {
    #[new]
    fn new(task_id: String, start_date: NaiveDate, end_date: NaiveDate, duration_days: f64) -> Self {
        Self {
            task_id,
            start_date,
            end_date,
            duration_days,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(task_id={:?}, start={}, end={})",
            self.task_id, self.start_date, self.end_date
        )
    }
}

/// Result of a scheduling run as handed to Python callers.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct ScheduleResult {
    #[pyo3(get, set)]
    pub earliest_finish: HashMap<String, f64>,
    #[pyo3(get, set)]
    pub earliest_start: HashMap<String, f64>,
    #[pyo3(get, set)]
    pub expected_durations: HashMap<String, f64>,
    /// Total slack per task; empty unless the total-slack test was used.
    #[pyo3(get, set)]
    pub slack: HashMap<String, f64>,
    #[pyo3(get, set)]
    pub critical_path: Vec<String>,
    #[pyo3(get, set)]
    pub topological_order: Vec<String>,
    #[pyo3(get, set)]
    pub project_duration: f64,
    #[pyo3(get, set)]
    pub critical_path_variance: f64,
    /// Calendar projection; empty unless a project start date was configured.
    #[pyo3(get, set)]
    pub scheduled_tasks: Vec<ScheduledTask>,
}

#[pymethods]
impl ScheduleResult {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(tasks={}, project_duration={}, critical_path={:?})",
            self.earliest_finish.len(),
            self.project_duration,
            self.critical_path
        )
    }
}
