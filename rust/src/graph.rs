//! Task dependency graph and topological ordering.
//!
//! Nodes are tasks (indexed by [`TaskIdx`] in input order), edges point from
//! predecessor to successor. Each task's expected duration is stored on the node;
//! an edge's weight is the duration of the task it points to.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::error::ScheduleError;
use crate::interner::{TaskIdx, TaskNameInterner};
use crate::models::Task;

/// Adjacency-list DAG over one run's task set.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    names: TaskNameInterner,
    /// Expected (PERT) duration per task.
    durations: Vec<f64>,
    /// PERT variance per task.
    variances: Vec<f64>,
    predecessors: Vec<Vec<TaskIdx>>,
    successors: Vec<Vec<TaskIdx>>,
}

impl DependencyGraph {
    /// Build the graph from task declarations.
    ///
    /// Validation runs in order: duplicate names, duration estimates, then
    /// predecessor/successor references. Cycles are only detected by
    /// [`DependencyGraph::topological_order`].
    pub fn build(tasks: &[Task]) -> Result<Self, ScheduleError> {
        let n = tasks.len();

        let mut names = TaskNameInterner::with_capacity(n);
        for task in tasks {
            if names.insert_unique(&task.name).is_none() {
                return Err(ScheduleError::DuplicateTask {
                    name: task.name.clone(),
                });
            }
        }

        let mut durations = Vec::with_capacity(n);
        let mut variances = Vec::with_capacity(n);
        for task in tasks {
            let estimate = task.estimate();
            estimate.validate(&task.name)?;
            durations.push(estimate.expected());
            variances.push(estimate.variance());
        }

        let mut graph = Self {
            names,
            durations,
            variances,
            predecessors: vec![Vec::new(); n],
            successors: vec![Vec::new(); n],
        };

        // Same edge may be declared from both ends or repeated
        let mut seen_edges: FxHashSet<(TaskIdx, TaskIdx)> = FxHashSet::default();

        for (idx, task) in tasks.iter().enumerate() {
            let idx = idx as TaskIdx;

            for pred in &task.predecessors {
                let pred_idx =
                    graph
                        .names
                        .get(pred)
                        .ok_or_else(|| ScheduleError::UnknownPredecessor {
                            task: task.name.clone(),
                            predecessor: pred.clone(),
                        })?;
                graph.add_edge(&mut seen_edges, pred_idx, idx);
            }

            for succ in &task.successors {
                let succ_idx =
                    graph
                        .names
                        .get(succ)
                        .ok_or_else(|| ScheduleError::UnknownSuccessor {
                            task: task.name.clone(),
                            successor: succ.clone(),
                        })?;
                graph.add_edge(&mut seen_edges, idx, succ_idx);
            }
        }

        Ok(graph)
    }

    fn add_edge(
        &mut self,
        seen_edges: &mut FxHashSet<(TaskIdx, TaskIdx)>,
        from: TaskIdx,
        to: TaskIdx,
    ) {
        if seen_edges.insert((from, to)) {
            self.successors[from as usize].push(to);
            self.predecessors[to as usize].push(from);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<TaskIdx> {
        self.names.get(name)
    }

    pub fn name(&self, idx: TaskIdx) -> &str {
        self.names.resolve(idx)
    }

    /// Expected duration of the task itself.
    pub fn duration(&self, idx: TaskIdx) -> f64 {
        self.durations[idx as usize]
    }

    pub fn variance(&self, idx: TaskIdx) -> f64 {
        self.variances[idx as usize]
    }

    pub fn predecessors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.predecessors[idx as usize]
    }

    pub fn successors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.successors[idx as usize]
    }

    /// Weight of edge `from -> to`: the expected duration of `to`.
    ///
    /// Returns `None` if no such edge exists.
    pub fn edge_weight(&self, from: TaskIdx, to: TaskIdx) -> Option<f64> {
        self.successors(from)
            .contains(&to)
            .then(|| self.duration(to))
    }

    /// All edges as `(from, to, weight)`, grouped by source in input order.
    pub fn edges(&self) -> impl Iterator<Item = (TaskIdx, TaskIdx, f64)> + '_ {
        self.successors.iter().enumerate().flat_map(move |(from, succs)| {
            succs
                .iter()
                .map(move |&to| (from as TaskIdx, to, self.duration(to)))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Topological order using Kahn's algorithm.
    ///
    /// Ties are broken by input order, so the result is deterministic.
    /// Fails with the participants of one cycle if the graph is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<TaskIdx>, ScheduleError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        let mut queue: VecDeque<TaskIdx> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(|i| i as TaskIdx)
            .collect();

        let mut order: Vec<TaskIdx> = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &succ in self.successors(idx) {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() != n {
            let mut remaining = vec![true; n];
            for &idx in &order {
                remaining[idx as usize] = false;
            }
            return Err(ScheduleError::CyclicDependency {
                cycle: self.find_cycle(&remaining),
            });
        }

        Ok(order)
    }

    /// Extract one cycle from the nodes Kahn's algorithm could not order.
    ///
    /// Every remaining node has at least one remaining predecessor, so walking
    /// predecessors from any remaining node must revisit a node.
    fn find_cycle(&self, remaining: &[bool]) -> Vec<String> {
        let Some(start) = remaining.iter().position(|&r| r) else {
            return Vec::new();
        };

        let mut path: Vec<TaskIdx> = Vec::new();
        let mut position: FxHashMap<TaskIdx, usize> = FxHashMap::default();
        let mut current = start as TaskIdx;

        let mut cycle: Vec<TaskIdx> = loop {
            if let Some(&pos) = position.get(&current) {
                break path.split_off(pos);
            }
            position.insert(current, path.len());
            path.push(current);

            let next = self
                .predecessors(current)
                .iter()
                .copied()
                .find(|&p| remaining[p as usize]);
            match next {
                Some(p) => current = p,
                None => break path,
            }
        };

        // Walked against edge direction; flip, then start at the earliest declared task
        cycle.reverse();
        if let Some(min_pos) = cycle
            .iter()
            .enumerate()
            .min_by_key(|(_, &idx)| idx)
            .map(|(pos, _)| pos)
        {
            cycle.rotate_left(min_pos);
        }

        cycle
            .into_iter()
            .map(|idx| self.name(idx).to_string())
            .collect()
    }
}
