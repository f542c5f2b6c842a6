//! Schedule calculation: forward pass, optional backward pass, critical path extraction.

use rustc_hash::FxHashMap;

use crate::backward_pass::{backward_pass, BackwardPassResult};
use crate::config::{CriticalPathTest, ScheduleConfig};
use crate::error::ScheduleError;
use crate::graph::DependencyGraph;
use crate::interner::TaskIdx;
use crate::models::Task;
use crate::{log_debug, log_phases, log_summary};

use super::types::{Schedule, TaskTiming};

/// Earliest times per task, indexed by [`TaskIdx`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardPassResult {
    pub earliest_start: Vec<f64>,
    pub earliest_finish: Vec<f64>,
}

impl ForwardPassResult {
    /// Maximum earliest finish, 0 when there are no tasks.
    pub fn project_duration(&self) -> f64 {
        self.earliest_finish.iter().copied().fold(0.0, f64::max)
    }
}

/// Propagate earliest start/finish times in topological order.
///
/// A task without predecessors starts at 0; otherwise it starts at the latest
/// earliest finish among its predecessors. It finishes after its own expected duration.
/// Fails if a finish time stops being finite.
pub fn forward_pass(
    graph: &DependencyGraph,
    topo_order: &[TaskIdx],
) -> Result<ForwardPassResult, ScheduleError> {
    let n = graph.len();
    let mut earliest_start = vec![0.0; n];
    let mut earliest_finish = vec![0.0; n];

    for &idx in topo_order {
        let mut start = 0.0;
        for &pred in graph.predecessors(idx) {
            let pred_finish = earliest_finish[pred as usize];
            if pred_finish > start {
                start = pred_finish;
            }
        }

        let finish = start + graph.duration(idx);
        if !finish.is_finite() {
            return Err(ScheduleError::DurationOverflow {
                task: graph.name(idx).to_string(),
            });
        }

        earliest_start[idx as usize] = start;
        earliest_finish[idx as usize] = finish;
    }

    Ok(ForwardPassResult {
        earliest_start,
        earliest_finish,
    })
}

/// Names of tasks passing `test`, preserving the order of `timings`.
pub fn extract_critical_path(timings: &[TaskTiming], test: CriticalPathTest) -> Vec<String> {
    timings
        .iter()
        .filter(|timing| timing.is_critical(test))
        .map(|timing| timing.task_id.clone())
        .collect()
}

/// Compute the CPM/PERT schedule for a task set.
///
/// All validation (duplicate names, invalid estimates, unknown references, cycles)
/// happens before any propagation; the first failure aborts the run. Overflow of
/// a finish time during propagation also aborts it.
///
/// # Arguments
/// * `tasks` - Task declarations; names must be unique
/// * `config` - Critical path test and logging verbosity
///
/// # Returns
/// * `Ok(Schedule)` with timings in topological order and the critical path
/// * `Err(ScheduleError)` describing the first validation failure
pub fn schedule(tasks: &[Task], config: &ScheduleConfig) -> Result<Schedule, ScheduleError> {
    let verbosity = config.verbosity;
    let test = config.parsed_test()?;

    let graph = DependencyGraph::build(tasks)?;
    log_phases!(
        verbosity,
        "Built dependency graph: {} tasks, {} edges",
        graph.len(),
        graph.edge_count()
    );

    let topo_order = graph.topological_order()?;
    log_phases!(verbosity, "Topological order: {} tasks", topo_order.len());

    let forward = forward_pass(&graph, &topo_order)?;
    let project_duration = forward.project_duration();
    log_phases!(
        verbosity,
        "Forward pass done, project duration {}",
        project_duration
    );

    let backward = match test {
        CriticalPathTest::TotalSlack => {
            let result = backward_pass(&graph, &topo_order, project_duration);
            log_phases!(verbosity, "Backward pass done");
            Some(result)
        }
        CriticalPathTest::ZeroDuration => None,
    };

    let timings = collect_timings(&graph, &topo_order, &forward, backward.as_ref());
    for timing in &timings {
        log_debug!(
            verbosity,
            "  {}: duration={} es={} ef={} slack={:?}",
            timing.task_id,
            timing.expected_duration,
            timing.earliest_start,
            timing.earliest_finish,
            timing.slack
        );
    }

    let critical_path = extract_critical_path(&timings, test);
    let critical_path_variance = timings
        .iter()
        .filter(|timing| timing.is_critical(test))
        .map(|timing| timing.variance)
        .sum();

    let earliest_finish: FxHashMap<String, f64> = timings
        .iter()
        .map(|timing| (timing.task_id.clone(), timing.earliest_finish))
        .collect();

    log_summary!(
        verbosity,
        "Scheduled {} tasks: project duration {}, critical path ({}) {:?}",
        timings.len(),
        project_duration,
        test.as_str(),
        critical_path
    );

    Ok(Schedule {
        timings,
        earliest_finish,
        critical_path,
        critical_path_test: test,
        project_duration,
        critical_path_variance,
    })
}

fn collect_timings(
    graph: &DependencyGraph,
    topo_order: &[TaskIdx],
    forward: &ForwardPassResult,
    backward: Option<&BackwardPassResult>,
) -> Vec<TaskTiming> {
    topo_order
        .iter()
        .map(|&idx| {
            let i = idx as usize;
            let earliest_start = forward.earliest_start[i];
            TaskTiming {
                task_id: graph.name(idx).to_string(),
                expected_duration: graph.duration(idx),
                variance: graph.variance(idx),
                earliest_start,
                earliest_finish: forward.earliest_finish[i],
                latest_start: backward.map(|b| b.latest_start[i]),
                latest_finish: backward.map(|b| b.latest_finish[i]),
                slack: backward.map(|b| b.slack(idx, earliest_start)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(name: &str, estimate: (f64, f64, f64), preds: Vec<&str>) -> Task {
        Task {
            name: name.to_string(),
            optimistic_duration: estimate.0,
            most_likely_duration: estimate.1,
            pessimistic_duration: estimate.2,
            predecessors: preds.into_iter().map(String::from).collect(),
            successors: vec![],
        }
    }

    fn fixed(name: &str, duration: f64, preds: Vec<&str>) -> Task {
        make_task(name, (duration, duration, duration), preds)
    }

    fn chain_tasks() -> Vec<Task> {
        vec![
            make_task("A", (1.0, 3.0, 5.0), vec![]),
            make_task("B", (2.0, 4.0, 6.0), vec!["A"]),
            make_task("C", (3.0, 5.0, 7.0), vec!["B"]),
            make_task("D", (4.0, 6.0, 8.0), vec!["C"]),
        ]
    }

    fn diamond_tasks() -> Vec<Task> {
        // a -> b -> d, a -> c -> d; via c is longer
        vec![
            fixed("a", 2.0, vec![]),
            fixed("b", 3.0, vec!["a"]),
            fixed("c", 5.0, vec!["a"]),
            fixed("d", 1.0, vec!["b", "c"]),
        ]
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_linear_chain_end_to_end() {
        let result = schedule(&chain_tasks(), &ScheduleConfig::default()).unwrap();

        let expected = [
            ("A", 3.0, 0.0, 3.0),
            ("B", 4.0, 3.0, 7.0),
            ("C", 5.0, 7.0, 12.0),
            ("D", 6.0, 12.0, 18.0),
        ];
        for (name, duration, es, ef) in expected {
            let timing = result.timing(name).unwrap();
            assert_close(timing.expected_duration, duration);
            assert_close(timing.earliest_start, es);
            assert_close(timing.earliest_finish, ef);
            assert_close(result.earliest_finish[name], ef);
        }
        assert_eq!(result.earliest_finish.len(), 4);
        assert_close(result.project_duration, 18.0);
        assert_eq!(
            result.topological_order().collect::<Vec<_>>(),
            vec!["A", "B", "C", "D"]
        );
    }

    #[test]
    fn test_zero_duration_test_gives_empty_path_for_positive_durations() {
        // Every task has positive duration, so ES != EF everywhere and the
        // zero-duration test selects nothing, even on a single chain.
        let result = schedule(&chain_tasks(), &ScheduleConfig::default()).unwrap();
        assert_eq!(result.critical_path_test, CriticalPathTest::ZeroDuration);
        assert!(result.critical_path.is_empty());
        assert_eq!(result.critical_path_variance, 0.0);
        assert!(result.timings.iter().all(|t| t.slack.is_none()));
    }

    #[test]
    fn test_zero_duration_test_selects_milestones() {
        let tasks = vec![
            fixed("kickoff", 0.0, vec![]),
            fixed("work", 4.0, vec!["kickoff"]),
            fixed("review", 0.0, vec!["work"]),
        ];
        let result = schedule(&tasks, &ScheduleConfig::default()).unwrap();
        assert_eq!(result.critical_path, vec!["kickoff", "review"]);
        assert_close(result.timing("review").unwrap().earliest_start, 4.0);
    }

    #[test]
    fn test_total_slack_on_chain_marks_every_task() {
        let config = ScheduleConfig::with_test(CriticalPathTest::TotalSlack);
        let result = schedule(&chain_tasks(), &config).unwrap();
        assert_eq!(result.critical_path, vec!["A", "B", "C", "D"]);
        // Variances: (4/6)^2 for each of the four tasks
        assert_close(result.critical_path_variance, 4.0 * (4.0 / 6.0) * (4.0 / 6.0));
    }

    #[test]
    fn test_total_slack_on_diamond() {
        let config = ScheduleConfig::with_test(CriticalPathTest::TotalSlack);
        let result = schedule(&diamond_tasks(), &config).unwrap();

        assert_close(result.project_duration, 8.0);
        assert_eq!(result.critical_path, vec!["a", "c", "d"]);

        let b = result.timing("b").unwrap();
        assert_close(b.slack.unwrap(), 2.0);
        assert_close(b.latest_start.unwrap(), 4.0);
        assert_close(b.latest_finish.unwrap(), 7.0);
    }

    #[test]
    fn test_earliest_start_is_max_of_predecessors() {
        let result = schedule(&diamond_tasks(), &ScheduleConfig::default()).unwrap();
        let d = result.timing("d").unwrap();
        // max(ef(b) = 5, ef(c) = 7)
        assert_close(d.earliest_start, 7.0);
        assert_close(d.earliest_finish, 8.0);
    }

    #[test]
    fn test_sources_start_at_zero() {
        let tasks = vec![
            make_task("x", (1.0, 2.0, 9.0), vec![]),
            fixed("y", 4.0, vec![]),
            fixed("z", 1.0, vec!["x", "y"]),
        ];
        let result = schedule(&tasks, &ScheduleConfig::default()).unwrap();
        for name in ["x", "y"] {
            let timing = result.timing(name).unwrap();
            assert_eq!(timing.earliest_start, 0.0);
            assert_close(timing.earliest_finish, timing.expected_duration);
        }
        assert_close(result.timing("x").unwrap().earliest_finish, 3.0);
    }

    #[test]
    fn test_isolated_task_included() {
        let mut tasks = chain_tasks();
        tasks.push(fixed("docs", 2.0, vec![]));
        let result = schedule(&tasks, &ScheduleConfig::default()).unwrap();
        assert_close(result.earliest_finish["docs"], 2.0);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_successor_declarations_propagate() {
        let mut a = fixed("a", 2.0, vec![]);
        a.successors = vec!["b".to_string()];
        let tasks = vec![a, fixed("b", 3.0, vec![])];
        let result = schedule(&tasks, &ScheduleConfig::default()).unwrap();
        assert_close(result.timing("b").unwrap().earliest_start, 2.0);
        assert_close(result.earliest_finish["b"], 5.0);
    }

    #[test]
    fn test_empty_task_set() {
        let result = schedule(&[], &ScheduleConfig::default()).unwrap();
        assert!(result.is_empty());
        assert!(result.critical_path.is_empty());
        assert_eq!(result.project_duration, 0.0);
    }

    #[test]
    fn test_cycle_aborts_run() {
        let tasks = vec![fixed("A", 1.0, vec!["B"]), fixed("B", 1.0, vec!["A"])];
        let err = schedule(&tasks, &ScheduleConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::CyclicDependency {
                cycle: vec!["A".to_string(), "B".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_predecessor_aborts_run() {
        let tasks = vec![fixed("A", 1.0, vec!["Z"])];
        assert!(matches!(
            schedule(&tasks, &ScheduleConfig::default()),
            Err(ScheduleError::UnknownPredecessor { .. })
        ));
    }

    #[test]
    fn test_duplicate_checked_before_unknown_reference() {
        let tasks = vec![fixed("A", 1.0, vec!["Z"]), fixed("A", 1.0, vec![])];
        assert!(matches!(
            schedule(&tasks, &ScheduleConfig::default()),
            Err(ScheduleError::DuplicateTask { .. })
        ));
    }

    #[test]
    fn test_unknown_critical_path_test_rejected() {
        let config = ScheduleConfig {
            critical_path_test: "float".to_string(),
            ..ScheduleConfig::default()
        };
        assert_eq!(
            schedule(&chain_tasks(), &config),
            Err(ScheduleError::UnknownCriticalPathTest("float".to_string()))
        );
    }

    #[test]
    fn test_idempotent() {
        let tasks = diamond_tasks();
        let config = ScheduleConfig::with_test(CriticalPathTest::TotalSlack);
        let first = schedule(&tasks, &config).unwrap();
        let second = schedule(&tasks, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_independent_runs_in_parallel() {
        let chain = chain_tasks();
        let diamond = diamond_tasks();
        let config = ScheduleConfig::default();

        let (chain_result, diamond_result) = std::thread::scope(|s| {
            let c = s.spawn(|| schedule(&chain, &config));
            let d = s.spawn(|| schedule(&diamond, &config));
            (c.join().unwrap(), d.join().unwrap())
        });

        assert_close(chain_result.unwrap().project_duration, 18.0);
        assert_close(diamond_result.unwrap().project_duration, 8.0);
    }

    #[test]
    fn test_forward_pass_directly() {
        let graph = DependencyGraph::build(&diamond_tasks()).unwrap();
        let order = graph.topological_order().unwrap();
        let forward = forward_pass(&graph, &order).unwrap();

        let c = graph.index_of("c").unwrap() as usize;
        assert_close(forward.earliest_start[c], 2.0);
        assert_close(forward.earliest_finish[c], 7.0);
        assert_close(forward.project_duration(), 8.0);
    }

    #[test]
    fn test_logging_does_not_affect_result() {
        let quiet = schedule(&diamond_tasks(), &ScheduleConfig::default()).unwrap();
        let config = ScheduleConfig {
            verbosity: crate::logging::VERBOSITY_DEBUG,
            ..ScheduleConfig::default()
        };
        let loud = schedule(&diamond_tasks(), &config).unwrap();
        assert_eq!(quiet, loud);
    }

    #[test]
    fn test_overflowing_estimate_aborts_run() {
        let tasks = vec![make_task("a", (0.0, 1e308, 0.0), vec![])];
        let config = ScheduleConfig::with_test(CriticalPathTest::TotalSlack);
        assert_eq!(
            schedule(&tasks, &config),
            Err(ScheduleError::InvalidDuration {
                task: "a".to_string(),
                field: "expected",
                value: f64::INFINITY,
            })
        );
    }

    #[test]
    fn test_overflowing_chain_aborts_run() {
        // Each expected duration is ~2.67e307; the seventh finish exceeds f64::MAX
        let names: Vec<String> = (0..8).map(|i| format!("t{i}")).collect();
        let tasks: Vec<Task> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let preds = if i == 0 { vec![] } else { vec![names[i - 1].as_str()] };
                make_task(name, (0.0, 4e307, 0.0), preds)
            })
            .collect();
        assert_eq!(
            schedule(&tasks, &ScheduleConfig::default()),
            Err(ScheduleError::DurationOverflow {
                task: "t6".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_duration_checked_before_unknown_reference() {
        let tasks = vec![
            fixed("a", 1.0, vec!["ghost"]),
            make_task("b", (1.0, -2.0, 3.0), vec![]),
        ];
        assert!(matches!(
            schedule(&tasks, &ScheduleConfig::default()),
            Err(ScheduleError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_unknown_reference_checked_before_cycle() {
        let tasks = vec![
            fixed("a", 1.0, vec!["b"]),
            fixed("b", 1.0, vec!["a"]),
            fixed("c", 1.0, vec!["ghost"]),
        ];
        assert_eq!(
            schedule(&tasks, &ScheduleConfig::default()),
            Err(ScheduleError::UnknownPredecessor {
                task: "c".to_string(),
                predecessor: "ghost".to_string(),
            })
        );
    }
}
