//! Myers' O(ND) line diff
//!
//! The search records the furthest-reaching point of every diagonal after each
//! edit distance, then walks those frontiers back from the end of both sequences.
//! Steps only carry indices into the compared slices, so nothing is cloned until
//! a caller copies the lines of a changed region.

use std::ops::Range;

/// One step of the shortest edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Keep { old: usize, new: usize },
    Remove { old: usize },
    Add { new: usize },
}

/// A maximal run of removals and additions between two kept lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedRegion {
    pub old: Range<usize>,
    pub new: Range<usize>,
}

pub struct MyersDiff<'d, T> {
    old: &'d [T],
    new: &'d [T],
}

impl<'d, T: PartialEq> MyersDiff<'d, T> {
    pub fn new(old: &'d [T], new: &'d [T]) -> Self {
        MyersDiff { old, new }
    }

    fn diagonal(&self, k: isize) -> usize {
        (k + (self.old.len() + self.new.len()) as isize) as usize
    }

    // a move down (addition) is taken when the diagonal above reaches further
    fn comes_from_above(&self, frontier: &[usize], k: isize, d: isize) -> bool {
        k == -d || (k != d && frontier[self.diagonal(k - 1)] < frontier[self.diagonal(k + 1)])
    }

    /// Frontier snapshots; entry `d` holds the furthest x per diagonal after `d` edits
    fn frontiers(&self) -> Vec<Vec<usize>> {
        let (n, m) = (self.old.len(), self.new.len());
        let mut frontier = vec![0; 2 * (n + m) + 2];
        let mut frontiers = Vec::new();

        for d in 0..=(n + m) as isize {
            for k in (-d..=d).step_by(2) {
                let mut x = if self.comes_from_above(&frontier, k, d) {
                    frontier[self.diagonal(k + 1)]
                } else {
                    frontier[self.diagonal(k - 1)] + 1
                };
                let mut y = (x as isize - k) as usize;

                while x < n && y < m && self.old[x] == self.new[y] {
                    x += 1;
                    y += 1;
                }

                frontier[self.diagonal(k)] = x;

                if x >= n && y >= m {
                    frontiers.push(frontier);
                    return frontiers;
                }
            }

            frontiers.push(frontier.clone());
        }

        frontiers
    }

    /// Shortest edit script from `old` to `new`, in sequence order
    pub fn steps(&self) -> Vec<Step> {
        let frontiers = self.frontiers();
        let (mut x, mut y) = (self.old.len(), self.new.len());
        let mut steps = Vec::new();

        for d in (1..frontiers.len()).rev() {
            let frontier = &frontiers[d - 1];
            let k = x as isize - y as isize;
            let from_above = self.comes_from_above(frontier, k, d as isize);
            let prev_k = if from_above { k + 1 } else { k - 1 };
            let prev_x = frontier[self.diagonal(prev_k)];
            let prev_y = (prev_x as isize - prev_k) as usize;

            while x > prev_x && y > prev_y {
                x -= 1;
                y -= 1;
                steps.push(Step::Keep { old: x, new: y });
            }

            steps.push(match from_above {
                true => Step::Add { new: prev_y },
                false => Step::Remove { old: prev_x },
            });
            (x, y) = (prev_x, prev_y);
        }

        while x > 0 && y > 0 {
            x -= 1;
            y -= 1;
            steps.push(Step::Keep { old: x, new: y });
        }

        steps.reverse();
        steps
    }

    /// Index ranges of every changed region, as zero-context hunks need them
    ///
    /// An empty range marks an insertion point (on the old side) or a pure
    /// deletion (on the new side).
    pub fn changed_regions(&self) -> Vec<ChangedRegion> {
        let mut regions = Vec::new();
        let mut current: Option<ChangedRegion> = None;
        let (mut old_idx, mut new_idx) = (0, 0);

        for step in self.steps() {
            match step {
                Step::Keep { .. } => {
                    regions.extend(current.take());
                    old_idx += 1;
                    new_idx += 1;
                }
                Step::Remove { .. } => {
                    current
                        .get_or_insert(ChangedRegion {
                            old: old_idx..old_idx,
                            new: new_idx..new_idx,
                        })
                        .old
                        .end += 1;
                    old_idx += 1;
                }
                Step::Add { .. } => {
                    current
                        .get_or_insert(ChangedRegion {
                            old: old_idx..old_idx,
                            new: new_idx..new_idx,
                        })
                        .new
                        .end += 1;
                    new_idx += 1;
                }
            }
        }

        regions.extend(current);
        regions
    }
}
