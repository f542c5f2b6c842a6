//! Backward pass computing latest start/finish times and total slack.
//!
//! Only run when critical tasks are selected by total slack; the zero-duration
//! test needs nothing beyond the forward pass.

use crate::graph::DependencyGraph;
use crate::interner::TaskIdx;

/// Latest times per task, indexed by [`TaskIdx`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackwardPassResult {
    pub latest_start: Vec<f64>,
    pub latest_finish: Vec<f64>,
}

impl BackwardPassResult {
    /// Total slack of a task: `latest_start - earliest_start`.
    pub fn slack(&self, idx: TaskIdx, earliest_start: f64) -> f64 {
        self.latest_start[idx as usize] - earliest_start
    }
}

/// Propagate latest finish times backward from the project end.
///
/// Tasks without successors must finish by `project_duration`; every other task
/// must finish before its earliest-starting successor's latest start.
///
/// # Arguments
/// * `graph` - Dependency graph the forward pass ran on
/// * `topo_order` - Same topological order the forward pass used
/// * `project_duration` - Maximum earliest finish over all tasks
pub fn backward_pass(
    graph: &DependencyGraph,
    topo_order: &[TaskIdx],
    project_duration: f64,
) -> BackwardPassResult {
    let n = graph.len();
    let mut latest_start = vec![0.0; n];
    let mut latest_finish = vec![0.0; n];

    for &idx in topo_order.iter().rev() {
        let successors = graph.successors(idx);
        let finish = if successors.is_empty() {
            project_duration
        } else {
            successors
                .iter()
                .map(|&succ| latest_start[succ as usize])
                .fold(f64::INFINITY, f64::min)
        };

        latest_finish[idx as usize] = finish;
        latest_start[idx as usize] = finish - graph.duration(idx);
    }

    BackwardPassResult {
        latest_start,
        latest_finish,
    }
}
