use std::collections::VecDeque;

use crate::action::Action;
use crate::config::{EngineConfig, RunParams, ScanOrder};
use crate::hiring::HiringPolicy;
use crate::plan::Plan;
use crate::reduce::apply;
use crate::search::{find_idle_worker, Commitments};
use crate::world::{Cell, World};

/// Day-by-day assignment engine.
///
/// Owns the grid, the worker registry and the day counter for the whole run.
/// Each call to [`Controller::next_day`] ingests snowfall, stages hires and
/// moves against the pre-commit view of the board, commits them (hires first,
/// then moves) and returns the actions in the order they were staged.
#[derive(Clone, Debug)]
pub struct Controller {
    params: RunParams,
    config: EngineConfig,
    policy: HiringPolicy,
    world: World,
    day: u64,
    pending: VecDeque<Cell>,
    queued: Vec<bool>,
}

impl Controller {
    pub fn new(params: RunParams, config: EngineConfig) -> Self {
        let world = World::new(params.board_size);
        let queued = vec![false; world.grid.cell_count()];
        Self {
            policy: config.hiring_policy(),
            params,
            config,
            world,
            day: 0,
            pending: VecDeque::new(),
            queued,
        }
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of days processed so far; the next call runs this 0-based day.
    pub fn day(&self) -> u64 {
        self.day
    }

    /// Advance one day with the newly snowed cells reported for it.
    pub fn next_day(&mut self, snowfall: &[Cell]) -> Vec<Action> {
        let day = self.day;
        self.day += 1;

        self.ingest(snowfall);

        if !self.params.clearing_pays() {
            return Vec::new();
        }

        let plan = self.assign(day);
        apply(&mut self.world, &plan);
        self.settle_pending();

        debug_assert!(
            self.world.check_invariants().is_ok(),
            "world inconsistent after day {}",
            day
        );
        debug_assert!(self.world.worker_count() <= self.policy.ceiling(day));
        debug_assert!(plan.destinations().all(|cell| !self.world.grid.is_snowed(cell)));

        plan.into_actions()
    }

    fn ingest(&mut self, snowfall: &[Cell]) {
        for &cell in snowfall {
            debug_assert!(self.world.grid.contains(cell), "snow outside board {:?}", cell);
            self.world.grid.mark_snow(cell);
            if self.config.scan == ScanOrder::PendingQueue {
                let index = self.world.grid.index(cell);
                if !self.queued[index] {
                    self.queued[index] = true;
                    self.pending.push_back(cell);
                }
            }
        }
    }

    fn targets(&self) -> Vec<Cell> {
        match self.config.scan {
            ScanOrder::RowMajor => self.world.grid.snowed_cells().collect(),
            ScanOrder::PendingQueue => self.pending.iter().copied().collect(),
        }
    }

    fn assign(&self, day: u64) -> Plan {
        let grid = &self.world.grid;
        let mut plan = Plan::default();
        let mut commitments = Commitments::new(self.config.hard_cap as usize, grid.cell_count());
        let mut worker_count = self.world.worker_count();

        for target in self.targets() {
            let index = grid.index(target);
            if !grid.is_snowed(target)
                || grid.occupant_of(target).is_some()
                || commitments.is_reserved(index)
            {
                continue;
            }

            if let Some(candidate) =
                find_idle_worker(&self.world, target, &self.config.search, &commitments)
            {
                commitments.commit(candidate.worker);
                commitments.reserve(grid.index(candidate.to));
                plan.record_move(candidate);
            } else if self.policy.approve(worker_count, day) {
                let worker = worker_count;
                worker_count += 1;
                commitments.commit(worker);
                commitments.reserve(index);
                plan.record_hire(worker, target);
            }
        }

        plan
    }

    fn settle_pending(&mut self) {
        if self.config.scan != ScanOrder::PendingQueue {
            return;
        }
        let grid = &self.world.grid;
        let queued = &mut self.queued;
        self.pending.retain(|&cell| {
            let keep = grid.is_snowed(cell);
            if !keep {
                queued[grid.index(cell)] = false;
            }
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Direction;
    use crate::search::SearchStrategy;

    fn params(board_size: u32, salary: u32, fine: u32) -> RunParams {
        RunParams {
            board_size,
            salary,
            fine,
        }
    }

    #[test]
    fn day_counter_advances_even_when_gated() {
        let mut controller = Controller::new(params(3, 50, 10), EngineConfig::default());
        assert!(controller.next_day(&[Cell::new(0, 0)]).is_empty());
        assert_eq!(controller.day(), 1);
        assert_eq!(controller.world().worker_count(), 0);
    }

    #[test]
    fn pinned_worker_is_never_reassigned() {
        let mut controller = Controller::new(params(3, 10, 50), EngineConfig::default());
        assert_eq!(
            controller.next_day(&[Cell::new(1, 1)]),
            vec![Action::Hire {
                cell: Cell::new(1, 1)
            }]
        );
        // Snow lands on the worker itself, then beside it.
        assert!(controller.next_day(&[Cell::new(1, 1)]).is_empty());
        let actions = controller.next_day(&[Cell::new(1, 2)]);
        assert_eq!(
            actions,
            vec![Action::Hire {
                cell: Cell::new(1, 2)
            }]
        );
        assert!(controller.world().grid.is_snowed(Cell::new(1, 1)));
    }

    #[test]
    fn one_worker_serves_one_cell_per_day() {
        let mut controller = Controller::new(params(3, 10, 50), EngineConfig::default());
        controller.next_day(&[Cell::new(1, 1)]);
        let actions = controller.next_day(&[Cell::new(1, 0), Cell::new(1, 2)]);
        assert_eq!(
            actions,
            vec![
                Action::Move {
                    worker: 0,
                    direction: Direction::Left
                },
                Action::Hire {
                    cell: Cell::new(1, 2)
                },
            ]
        );
        assert_eq!(controller.world().position(0), Some(Cell::new(1, 0)));
        assert_eq!(controller.world().position(1), Some(Cell::new(1, 2)));
    }

    #[test]
    fn pending_queue_follows_report_order() {
        let config = EngineConfig {
            scan: ScanOrder::PendingQueue,
            ..EngineConfig::default()
        };
        let mut controller = Controller::new(params(4, 10, 50), config);
        let actions = controller.next_day(&[Cell::new(3, 3), Cell::new(0, 0)]);
        assert_eq!(
            actions,
            vec![
                Action::Hire {
                    cell: Cell::new(3, 3)
                },
                Action::Hire {
                    cell: Cell::new(0, 0)
                },
            ]
        );
        assert!(controller.pending.is_empty());
    }

    #[test]
    fn pending_queue_keeps_uncleared_cells() {
        let config = EngineConfig {
            scan: ScanOrder::PendingQueue,
            hard_cap: 0,
            ..EngineConfig::default()
        };
        let mut controller = Controller::new(params(4, 10, 50), config);
        assert!(controller.next_day(&[Cell::new(2, 2), Cell::new(2, 2)]).is_empty());
        assert_eq!(controller.pending.len(), 1);
    }

    #[test]
    fn bounded_search_walks_a_worker_toward_distant_snow() {
        let config = EngineConfig {
            search: SearchStrategy::Diamond { radius: 12 },
            hard_cap: 1,
            ..EngineConfig::default()
        };
        let mut controller = Controller::new(params(5, 10, 50), config);
        controller.next_day(&[Cell::new(0, 0)]);
        let actions = controller.next_day(&[Cell::new(0, 3)]);
        assert_eq!(
            actions,
            vec![Action::Move {
                worker: 0,
                direction: Direction::Right
            }]
        );
        assert_eq!(controller.world().position(0), Some(Cell::new(0, 1)));
        assert!(controller.world().grid.is_snowed(Cell::new(0, 3)));

        assert_eq!(controller.next_day(&[]).len(), 1);
        assert_eq!(controller.next_day(&[]).len(), 1);
        assert_eq!(controller.world().position(0), Some(Cell::new(0, 3)));
        assert_eq!(controller.world().grid.snow_count(), 0);
    }
}
