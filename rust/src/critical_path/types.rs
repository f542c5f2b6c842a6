//! Types for schedule results.

use rustc_hash::FxHashMap;

use crate::config::CriticalPathTest;

/// Absolute tolerance for float comparisons in the critical-path tests.
pub(crate) const CRITICAL_EPSILON: f64 = 1e-9;

/// Per-task timing information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskTiming {
    pub task_id: String,
    /// PERT expected duration.
    pub expected_duration: f64,
    /// PERT variance.
    pub variance: f64,
    /// Earliest possible start time (from forward pass).
    pub earliest_start: f64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: f64,
    /// Latest allowable start time; only set when a backward pass ran.
    pub latest_start: Option<f64>,
    /// Latest allowable finish time; only set when a backward pass ran.
    pub latest_finish: Option<f64>,
    /// Total slack = latest_start - earliest_start; only set when a backward pass ran.
    pub slack: Option<f64>,
}

impl TaskTiming {
    pub fn is_critical(&self, test: CriticalPathTest) -> bool {
        match test {
            CriticalPathTest::ZeroDuration => {
                (self.earliest_finish - self.earliest_start).abs() < CRITICAL_EPSILON
            }
            CriticalPathTest::TotalSlack => self
                .slack
                .is_some_and(|slack| slack.abs() < CRITICAL_EPSILON),
        }
    }
}

/// Result of one scheduling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    /// Timings for every task, in the topological order used for propagation.
    pub timings: Vec<TaskTiming>,
    /// Earliest finish time per task name.
    pub earliest_finish: FxHashMap<String, f64>,
    /// Tasks passing the critical-path test, in topological order.
    pub critical_path: Vec<String>,
    /// Test used to select `critical_path`.
    pub critical_path_test: CriticalPathTest,
    /// Maximum earliest finish (0 for an empty task set).
    pub project_duration: f64,
    /// Sum of PERT variances over `critical_path`.
    pub critical_path_variance: f64,
}

impl Schedule {
    pub fn topological_order(&self) -> impl Iterator<Item = &str> {
        self.timings.iter().map(|t| t.task_id.as_str())
    }

    pub fn timing(&self, task_id: &str) -> Option<&TaskTiming> {
        self.timings.iter().find(|t| t.task_id == task_id)
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}
