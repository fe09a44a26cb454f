//! Pass 2: Dependency graph -- adjacency over the active units, cycle
//! detection, and the least-reference order used to drive composition.

use crate::error::ResolveError;
use crate::pass1_parse::{ParsedScript, UnitId};
use std::collections::BTreeSet;
use tracing::debug;

/// Follow graph over unit ids `0..len`. An edge `b -> a` in `successors`
/// means `a` follows `b`, so `b` must be resolved first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    predecessors: Vec<BTreeSet<UnitId>>,
    successors: Vec<BTreeSet<UnitId>>,
}

impl DependencyGraph {
    /// Build the graph from one parsed script per unit, indexed by unit id.
    pub fn build(scripts: &[ParsedScript]) -> Self {
        let mut graph = DependencyGraph {
            predecessors: vec![BTreeSet::new(); scripts.len()],
            successors: vec![BTreeSet::new(); scripts.len()],
        };
        for (follower, script) in scripts.iter().enumerate() {
            for follow in &script.follows {
                graph.successors[follow.target].insert(follower);
                graph.predecessors[follower].insert(follow.target);
            }
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Units that `node` follows.
    pub fn predecessors(&self, node: UnitId) -> &BTreeSet<UnitId> {
        &self.predecessors[node]
    }

    /// Units that follow `node`.
    pub fn successors(&self, node: UnitId) -> &BTreeSet<UnitId> {
        &self.successors[node]
    }

    /// Fail with [`ResolveError::CircularDependency`] if any cycle exists.
    /// `names` maps unit ids to names for the error message.
    pub fn check_acyclic(&self, names: &[&str]) -> Result<(), ResolveError> {
        let mut visited = vec![false; self.len()];
        let mut on_stack = vec![false; self.len()];

        for start in 0..self.len() {
            if visited[start] {
                continue;
            }
            if let Some(cycle) = self.find_cycle(start, &mut visited, &mut on_stack) {
                let cycle: Vec<String> = cycle
                    .into_iter()
                    .map(|id| names.get(id).copied().unwrap_or("?").to_string())
                    .collect();
                return Err(ResolveError::CircularDependency { cycle });
            }
        }
        Ok(())
    }

    /// Depth-first search from `start` along successor edges with an
    /// explicit stack, so chain length is bounded by the heap rather than
    /// the call stack. `path` mirrors the stack for cycle reporting.
    fn find_cycle(
        &self,
        start: UnitId,
        visited: &mut [bool],
        on_stack: &mut [bool],
    ) -> Option<Vec<UnitId>> {
        let mut path: Vec<UnitId> = vec![start];
        let mut stack = vec![self.successors[start].iter()];
        visited[start] = true;
        on_stack[start] = true;

        while let Some(successors) = stack.last_mut() {
            match successors.next() {
                Some(&next) if on_stack[next] => {
                    // on-stack nodes are always in `path`
                    let pos = path.iter().position(|&n| n == next).unwrap_or(0);
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Some(&next) if !visited[next] => {
                    visited[next] = true;
                    on_stack[next] = true;
                    path.push(next);
                    stack.push(self.successors[next].iter());
                }
                Some(_) => {}
                None => {
                    stack.pop();
                    if let Some(done) = path.pop() {
                        on_stack[done] = false;
                    }
                }
            }
        }
        None
    }

    /// Least-reference order: waves outward from the units that follow
    /// nothing, then each unit kept only at its last occurrence so that it
    /// lands after the deepest chain reaching it.
    ///
    /// Only meaningful on an acyclic graph; call [`check_acyclic`] first.
    ///
    /// [`check_acyclic`]: DependencyGraph::check_acyclic
    pub fn resolution_order(&self) -> ResolutionOrder {
        let mut layered: Vec<UnitId> = (0..self.len())
            .filter(|&n| self.predecessors[n].is_empty())
            .collect();
        let mut frontier = layered.clone();
        let mut waves = 0usize;

        let mut in_wave = vec![false; self.len()];

        while !frontier.is_empty() {
            let mut wave: Vec<UnitId> = Vec::new();
            for &node in &frontier {
                for &next in &self.successors[node] {
                    if !in_wave[next] {
                        in_wave[next] = true;
                        wave.push(next);
                    }
                }
            }
            for &node in &wave {
                in_wave[node] = false;
            }
            layered.extend_from_slice(&wave);
            frontier = wave;
            waves += 1;
        }

        let mut last = vec![None; self.len()];
        for (pos, &node) in layered.iter().enumerate() {
            last[node] = Some(pos);
        }
        let sequence: Vec<UnitId> = layered
            .iter()
            .enumerate()
            .filter(|&(pos, &node)| last[node] == Some(pos))
            .map(|(_, &node)| node)
            .collect();

        debug!(
            units = self.len(),
            waves,
            layered = layered.len(),
            "computed least-reference order"
        );
        ResolutionOrder::new(sequence, self.len())
    }
}

/// Units in dependency order, with a position table for O(1) lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOrder {
    sequence: Vec<UnitId>,
    position: Vec<Option<usize>>,
}

impl ResolutionOrder {
    fn new(sequence: Vec<UnitId>, len: usize) -> Self {
        let mut position = vec![None; len];
        for (pos, &node) in sequence.iter().enumerate() {
            position[node] = Some(pos);
        }
        ResolutionOrder { sequence, position }
    }

    pub fn as_slice(&self) -> &[UnitId] {
        &self.sequence
    }

    pub fn position_of(&self, node: UnitId) -> Option<usize> {
        self.position.get(node).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.sequence.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
