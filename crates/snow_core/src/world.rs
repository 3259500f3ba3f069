use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::action::Direction;

/// Dense worker identifier, allocated in hiring order.
pub type WorkerId = u32;

/// Board coordinate. Ordering is row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Neighbouring cell in `direction`, or `None` when it leaves a board of
    /// `board_size` cells per side.
    pub fn step(self, direction: Direction, board_size: u32) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row = i64::from(self.row) + dr;
        let col = i64::from(self.col) + dc;
        let size = i64::from(board_size);
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Cell::new(row as u32, col as u32))
        } else {
            None
        }
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn chebyshev(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

/// Per-cell snow flags and occupants.
#[derive(Clone, Debug)]
pub struct Grid {
    size: u32,
    snowed: Vec<bool>,
    occupant: Vec<Option<WorkerId>>,
}

impl Grid {
    pub fn new(size: u32) -> Self {
        let cells = (size as usize) * (size as usize);
        Self {
            size,
            snowed: vec![false; cells],
            occupant: vec![None; cells],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Flat row-major index of `cell`.
    pub fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "cell {:?} outside board", cell);
        cell.row as usize * self.size as usize + cell.col as usize
    }

    pub fn cell_count(&self) -> usize {
        self.snowed.len()
    }

    pub fn mark_snow(&mut self, cell: Cell) {
        let index = self.index(cell);
        self.snowed[index] = true;
    }

    pub fn clear_snow(&mut self, cell: Cell) {
        let index = self.index(cell);
        self.snowed[index] = false;
    }

    pub fn is_snowed(&self, cell: Cell) -> bool {
        self.snowed[self.index(cell)]
    }

    pub fn occupant_of(&self, cell: Cell) -> Option<WorkerId> {
        self.occupant[self.index(cell)]
    }

    /// Occupied and not under snow.
    pub fn is_idle(&self, cell: Cell) -> bool {
        self.occupant_of(cell).is_some() && !self.is_snowed(cell)
    }

    pub(crate) fn set_occupant(&mut self, cell: Cell, worker: Option<WorkerId>) {
        let index = self.index(cell);
        self.occupant[index] = worker;
    }

    /// Snowed cells in row-major order.
    pub fn snowed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let size = self.size;
        self.snowed
            .iter()
            .enumerate()
            .filter(|(_, snowed)| **snowed)
            .map(move |(index, _)| {
                Cell::new((index / size as usize) as u32, (index % size as usize) as u32)
            })
    }

    pub fn snow_count(&self) -> usize {
        self.snowed.iter().filter(|snowed| **snowed).count()
    }
}

/// Grid state plus the worker registry.
#[derive(Clone, Debug)]
pub struct World {
    pub grid: Grid,
    workers: Vec<Cell>,
}

impl World {
    pub fn new(board_size: u32) -> Self {
        Self {
            grid: Grid::new(board_size),
            workers: Vec::new(),
        }
    }

    pub fn board_size(&self) -> u32 {
        self.grid.size()
    }

    pub fn worker_count(&self) -> u32 {
        self.workers.len() as u32
    }

    pub fn position(&self, worker: WorkerId) -> Option<Cell> {
        self.workers.get(worker as usize).copied()
    }

    pub fn workers(&self) -> &[Cell] {
        &self.workers
    }

    /// Register a new worker at `cell`, clearing the snow beneath it.
    pub fn hire(&mut self, cell: Cell) -> WorkerId {
        let id = self.workers.len() as WorkerId;
        self.workers.push(cell);
        self.grid.set_occupant(cell, Some(id));
        self.grid.clear_snow(cell);
        id
    }

    /// Move `worker` onto `to`, clearing the snow there. Returns the vacated cell.
    pub fn relocate(&mut self, worker: WorkerId, to: Cell) -> Option<Cell> {
        let from = self.position(worker)?;
        if self.grid.occupant_of(from) == Some(worker) {
            self.grid.set_occupant(from, None);
        }
        self.grid.set_occupant(to, Some(worker));
        self.grid.clear_snow(to);
        self.workers[worker as usize] = to;
        Some(from)
    }

    /// Verify the registry and the occupant map agree cell for cell.
    pub fn check_invariants(&self) -> Result<()> {
        for (id, &cell) in self.workers.iter().enumerate() {
            ensure!(
                self.grid.contains(cell),
                "worker {} sits outside the board at {:?}",
                id,
                cell
            );
            ensure!(
                self.grid.occupant_of(cell) == Some(id as WorkerId),
                "worker {} registered at {:?} but the cell holds {:?}",
                id,
                cell,
                self.grid.occupant_of(cell)
            );
        }
        let occupied = self.grid.occupant.iter().filter(|o| o.is_some()).count();
        ensure!(
            occupied == self.workers.len(),
            "{} occupied cells for {} workers",
            occupied,
            self.workers.len()
        );
        Ok(())
    }
}
