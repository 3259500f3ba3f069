//! Scoring ledger and command validator.
//!
//! Mirrors the contest judge: each day snow is added, commands are applied
//! one by one (the first rejection ends the run), snow under every worker is
//! swept away, then the day's fine and wages are charged.

use std::collections::HashSet;

use crate::action::Action;
use crate::config::RunParams;
use crate::error::JudgeError;
use crate::hiring::MAX_WORKERS;
use crate::world::{Cell, WorkerId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Totals {
    pub fine: u64,
    pub salary: u64,
}

impl Totals {
    pub fn score(&self) -> u64 {
        self.fine + self.salary
    }
}

#[derive(Clone, Debug)]
pub struct Judge {
    params: RunParams,
    snow: Vec<bool>,
    uncleared: u64,
    workers: Vec<Cell>,
    used: HashSet<WorkerId>,
    day: Option<u64>,
    totals: Totals,
}

impl Judge {
    pub fn new(params: RunParams) -> Self {
        let cells = (params.board_size as usize) * (params.board_size as usize);
        Self {
            params,
            snow: vec![false; cells],
            uncleared: 0,
            workers: Vec::new(),
            used: HashSet::new(),
            day: None,
            totals: Totals::default(),
        }
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    /// Current 0-based day, once the first day has started.
    pub fn day(&self) -> Option<u64> {
        self.day
    }

    pub fn uncleared(&self) -> u64 {
        self.uncleared
    }

    pub fn workers(&self) -> &[Cell] {
        &self.workers
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn score(&self) -> u64 {
        self.totals.score()
    }

    pub fn is_snowed(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|index| self.snow[index])
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let size = self.params.board_size;
        (cell.row < size && cell.col < size)
            .then(|| cell.row as usize * size as usize + cell.col as usize)
    }

    fn add_snow(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            if !self.snow[index] {
                self.snow[index] = true;
                self.uncleared += 1;
            }
        }
    }

    fn remove_snow(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            if self.snow[index] {
                self.snow[index] = false;
                self.uncleared -= 1;
            }
        }
    }

    /// Open the next day and drop the day's snowfall on the board.
    pub fn start_day(&mut self, snowfall: &[Cell]) -> u64 {
        let day = self.day.map_or(0, |day| day + 1);
        self.day = Some(day);
        self.used.clear();
        for &cell in snowfall {
            self.add_snow(cell);
        }
        day
    }

    /// Validate and apply one raw command line.
    pub fn submit_line(&mut self, index: usize, line: &str) -> Result<(), JudgeError> {
        let day = self.day.ok_or(JudgeError::NoDayInProgress)?;
        let action = line
            .parse::<Action>()
            .map_err(|source| JudgeError::MalformedCommand { day, index, source })?;
        self.submit(index, &action)
    }

    /// Validate and apply one parsed command.
    pub fn submit(&mut self, index: usize, action: &Action) -> Result<(), JudgeError> {
        let day = self.day.ok_or(JudgeError::NoDayInProgress)?;
        match *action {
            Action::Hire { cell } => {
                if self.workers.len() as u32 == MAX_WORKERS {
                    return Err(JudgeError::TooManyWorkers {
                        day,
                        index,
                        cap: MAX_WORKERS,
                    });
                }
                if self.index(cell).is_none() {
                    return Err(JudgeError::HireOutsideBoard { day, index });
                }
                self.workers.push(cell);
                self.used.insert(self.workers.len() as WorkerId - 1);
                self.remove_snow(cell);
            }
            Action::Move { worker, direction } => {
                let Some(&position) = self.workers.get(worker as usize) else {
                    return Err(JudgeError::UnknownWorker { day, index });
                };
                if self.used.contains(&worker) {
                    return Err(JudgeError::WorkerReused { day, index });
                }
                let next = position
                    .step(direction, self.params.board_size)
                    .ok_or(JudgeError::MoveOutsideBoard { day, index })?;
                self.workers[worker as usize] = next;
                self.remove_snow(next);
                self.used.insert(worker);
            }
        }
        Ok(())
    }

    /// Apply a whole day's commands in order.
    pub fn submit_all(&mut self, actions: &[Action]) -> Result<(), JudgeError> {
        actions
            .iter()
            .enumerate()
            .try_for_each(|(index, action)| self.submit(index, action))
    }

    /// Sweep snow under every worker, then charge the day's fine and wages.
    pub fn end_day(&mut self) {
        for cell in self.workers.clone() {
            self.remove_snow(cell);
        }
        self.totals.fine += u64::from(self.params.fine) * self.uncleared;
        self.totals.salary += u64::from(self.params.salary) * self.workers.len() as u64;
    }
}
