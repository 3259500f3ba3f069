//! Nearest idle worker search.
//!
//! Every strategy is a breadth-first expansion from the snowed target that
//! visits neighbours in [`Direction::SEARCH_ORDER`] (left, right, up, down) at
//! every level, so distance ties resolve to whichever worker is discovered
//! first. The strategies differ only in how far the expansion may reach:
//!
//! * [`SearchStrategy::Adjacent`] inspects the four orthogonal neighbours and
//!   nothing else. Snow with no worker beside it is left for a later day or a
//!   hire, even when idle workers stand two cells away.
//! * [`SearchStrategy::Diamond`] reaches cells within a Manhattan radius.
//! * [`SearchStrategy::Window`] reaches cells within a square box.
//!
//! A worker found at distance `d` advances a single cell toward the target
//! along the discovered path; it never jumps straight onto the target unless
//! `d == 1`. The expansion only passes through unoccupied cells that no other
//! staged action has claimed this day.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::action::Direction;
use crate::world::{Cell, WorkerId, World};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchStrategy {
    #[default]
    Adjacent,
    Diamond { radius: u32 },
    Window { half_extent: u32 },
}

impl SearchStrategy {
    fn reaches(&self, target: Cell, cell: Cell) -> bool {
        match *self {
            SearchStrategy::Adjacent => target.manhattan(cell) <= 1,
            SearchStrategy::Diamond { radius } => target.manhattan(cell) <= radius,
            SearchStrategy::Window { half_extent } => target.chebyshev(cell) <= half_extent,
        }
    }
}

/// Per-day bookkeeping of workers already given a command and cells already
/// claimed as a destination.
#[derive(Clone, Debug, Default)]
pub struct Commitments {
    committed: Vec<bool>,
    reserved: Vec<bool>,
}

impl Commitments {
    pub fn new(worker_capacity: usize, cell_count: usize) -> Self {
        Self {
            committed: vec![false; worker_capacity],
            reserved: vec![false; cell_count],
        }
    }

    pub fn is_committed(&self, worker: WorkerId) -> bool {
        self.committed.get(worker as usize).copied().unwrap_or(false)
    }

    pub fn commit(&mut self, worker: WorkerId) {
        let index = worker as usize;
        if index >= self.committed.len() {
            self.committed.resize(index + 1, false);
        }
        self.committed[index] = true;
    }

    pub fn is_reserved(&self, cell_index: usize) -> bool {
        self.reserved.get(cell_index).copied().unwrap_or(false)
    }

    pub fn reserve(&mut self, cell_index: usize) {
        if cell_index >= self.reserved.len() {
            self.reserved.resize(cell_index + 1, false);
        }
        self.reserved[cell_index] = true;
    }
}

/// An idle worker and the single step that brings it closer to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub worker: WorkerId,
    pub from: Cell,
    pub to: Cell,
    pub direction: Direction,
}

/// Locate the closest idle, uncommitted worker for `target`.
pub fn find_idle_worker(
    world: &World,
    target: Cell,
    strategy: &SearchStrategy,
    commitments: &Commitments,
) -> Option<Candidate> {
    let grid = &world.grid;
    let size = grid.size();
    let mut visited = vec![false; grid.cell_count()];
    let mut frontier = VecDeque::new();
    visited[grid.index(target)] = true;
    frontier.push_back(target);

    while let Some(cell) = frontier.pop_front() {
        for direction in Direction::SEARCH_ORDER {
            let Some(next) = cell.step(direction, size) else {
                continue;
            };
            let index = grid.index(next);
            if visited[index] || !strategy.reaches(target, next) {
                continue;
            }
            visited[index] = true;

            match grid.occupant_of(next) {
                Some(worker) => {
                    if grid.is_idle(next) && !commitments.is_committed(worker) {
                        return Some(Candidate {
                            worker,
                            from: next,
                            to: cell,
                            direction: direction.opposite(),
                        });
                    }
                }
                None if !commitments.is_reserved(index) => frontier.push_back(next),
                None => {}
            }
        }
    }

    None
}
