//! Route resolution between commits
//!
//! A route is the ordered list of deltas to replay to carry the working tree
//! from one commit to another:
//!
//! - `Backward(c)` undoes commit `c` and lands on `c.prev`,
//! - `Forward(c)` applies commit `c`, landing on `c`.
//!
//! Moves within one line of history walk `prev` pointers or the current
//! branch's edges. Anything else goes through a breadth-first search that
//! starts at the target and expands over the `prev` edge first, then over the
//! branch edges in branch name order; the first time it reaches the start the
//! back-references spell out the route in start-to-target order.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit_id::CommitId;
use crate::errors::CvsError;
use derive_new::new;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct Step {
    pub commit: CommitId,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    steps: Vec<Step>,
}

impl Route {
    pub fn new(steps: Vec<Step>) -> Self {
        Route { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Maximal runs of steps sharing a direction; each change marks a fork crossing
    pub fn runs(&self) -> impl Iterator<Item = &[Step]> {
        self.steps
            .chunk_by(|left, right| left.direction == right.direction)
    }

    /// The route leading back to where this one started
    #[cfg(test)]
    pub fn inverse(&self) -> Self {
        Route {
            steps: self
                .steps
                .iter()
                .rev()
                .map(|step| Step::new(step.commit, step.direction.reversed()))
                .collect(),
        }
    }
}

/// Edge followed by the search to reach a commit from its parent search node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// the node is the `prev` of its parent
    Prev,
    /// the node is a branch child of its parent
    Next,
}

#[derive(Debug)]
struct SearchNode {
    commit: CommitId,
    parent: Option<(usize, Edge)>,
}

#[derive(new)]
pub struct PathResolver<'g> {
    graph: &'g CommitGraph,
}

impl<'g> PathResolver<'g> {
    pub fn resolve(&self, start: CommitId, target: CommitId) -> anyhow::Result<Route> {
        if start == target {
            return Ok(Route::default());
        }

        if let Some(route) = self.walk_back(start, target)? {
            debug!(%start, %target, steps = route.steps().len(), "resolved backward route");
            return Ok(route);
        }

        let branch = self.graph.commit_info(start)?.branch().clone();
        if let Some(route) = self.walk_forward(start, target, &branch)? {
            debug!(%start, %target, %branch, steps = route.steps().len(), "resolved forward route");
            return Ok(route);
        }

        let route = self.cross_branch(start, target)?;
        debug!(%start, %target, steps = route.steps().len(), "resolved cross-branch route");

        Ok(route)
    }

    /// Purely backward route for `reset`; the target must be an ancestor of `start`
    pub fn backward_to(&self, start: CommitId, target: CommitId) -> anyhow::Result<Route> {
        if start == target {
            return Ok(Route::default());
        }

        self.walk_back(start, target)?.ok_or_else(|| {
            CvsError::NotAnAncestor {
                target,
                head: start,
            }
            .into()
        })
    }

    /// Undo `count` commits from `start`
    pub fn steps_back(&self, start: CommitId, count: usize) -> anyhow::Result<(Route, CommitId)> {
        let mut steps = Vec::with_capacity(count);
        let mut current = start;

        while steps.len() < count {
            match self.graph.commit_info(current)?.prev() {
                Some(prev) => {
                    steps.push(Step::new(current, Direction::Backward));
                    current = prev;
                }
                None => {
                    return Err(CvsError::InsufficientHistory {
                        requested: count,
                        available: steps.len(),
                    }
                    .into());
                }
            }
        }

        Ok((Route::new(steps), current))
    }

    /// Apply the next `count` commits of `branch` from `start`
    pub fn steps_forward(
        &self,
        start: CommitId,
        branch: &BranchName,
        count: usize,
    ) -> anyhow::Result<(Route, CommitId)> {
        let mut steps = Vec::with_capacity(count);
        let mut current = start;

        while steps.len() < count {
            match self.graph.next_commit_on(current, branch)? {
                Some(next) => {
                    steps.push(Step::new(next, Direction::Forward));
                    current = next;
                }
                None => {
                    return Err(CvsError::InsufficientHistory {
                        requested: count,
                        available: steps.len(),
                    }
                    .into());
                }
            }
        }

        Ok((Route::new(steps), current))
    }

    /// Route and landing commit for a switch from `start` to `revision`
    pub fn route_to(
        &self,
        start: CommitId,
        revision: &Revision,
    ) -> anyhow::Result<(Route, CommitId)> {
        match revision {
            Revision::Tag(tag) => {
                let target = self.graph.resolve_tag(tag)?;
                Ok((self.resolve(start, target)?, target))
            }
            Revision::Back(count) => self.steps_back(start, *count),
            Revision::Forward(count) => {
                let branch = self.graph.commit_info(start)?.branch().clone();
                self.steps_forward(start, &branch, *count)
            }
        }
    }

    fn walk_back(&self, start: CommitId, target: CommitId) -> anyhow::Result<Option<Route>> {
        let mut steps = Vec::new();
        let mut current = start;

        while current != target {
            match self.graph.commit_info(current)?.prev() {
                Some(prev) => {
                    steps.push(Step::new(current, Direction::Backward));
                    current = prev;
                }
                None => return Ok(None),
            }
        }

        Ok(Some(Route::new(steps)))
    }

    fn walk_forward(
        &self,
        start: CommitId,
        target: CommitId,
        branch: &BranchName,
    ) -> anyhow::Result<Option<Route>> {
        let mut steps = Vec::new();
        let mut current = start;

        while current != target {
            match self.graph.next_commit_on(current, branch)? {
                Some(next) => {
                    steps.push(Step::new(next, Direction::Forward));
                    current = next;
                }
                None => return Ok(None),
            }
        }

        Ok(Some(Route::new(steps)))
    }

    pub fn cross_branch(&self, start: CommitId, target: CommitId) -> anyhow::Result<Route> {
        if start == target {
            return Ok(Route::default());
        }

        let mut arena = vec![SearchNode {
            commit: target,
            parent: None,
        }];
        let mut visited = HashSet::from([target]);
        let mut frontier = VecDeque::from([0usize]);

        while let Some(idx) = frontier.pop_front() {
            let commit = self.graph.commit_info(arena[idx].commit)?;

            let neighbours = commit
                .prev()
                .map(|prev| (prev, Edge::Prev))
                .into_iter()
                .chain(commit.children().map(|child| (child, Edge::Next)));

            for (neighbour, edge) in neighbours {
                if !visited.insert(neighbour) {
                    continue;
                }

                arena.push(SearchNode {
                    commit: neighbour,
                    parent: Some((idx, edge)),
                });

                if neighbour == start {
                    return Ok(Self::trace_back(&arena, arena.len() - 1));
                }
                frontier.push_back(arena.len() - 1);
            }
        }

        Err(CvsError::NoRoute {
            from: start,
            to: target,
        }
        .into())
    }

    // walking from the start node towards the search root already yields start-to-target order
    fn trace_back(arena: &[SearchNode], from: usize) -> Route {
        let mut steps = Vec::new();
        let mut node = &arena[from];

        while let Some((parent_idx, edge)) = node.parent {
            let parent = &arena[parent_idx];
            steps.push(match edge {
                Edge::Prev => Step::new(parent.commit, Direction::Forward),
                Edge::Next => Step::new(node.commit, Direction::Backward),
            });
            node = parent;
        }

        Route::new(steps)
    }
}
