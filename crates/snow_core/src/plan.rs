use crate::action::{Action, Direction};
use crate::search::Candidate;
use crate::world::{Cell, WorkerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedHire {
    pub worker: WorkerId,
    pub cell: Cell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedMove {
    pub worker: WorkerId,
    pub from: Cell,
    pub to: Cell,
    pub direction: Direction,
}

/// Actions staged during one day, held back until the day commits.
///
/// `actions` keeps the interleaved staging order that is emitted to the
/// judge; `hires` and `moves` keep the two commit phases apart.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    actions: Vec<Action>,
    hires: Vec<StagedHire>,
    moves: Vec<StagedMove>,
}

impl Plan {
    pub fn record_hire(&mut self, worker: WorkerId, cell: Cell) {
        self.actions.push(Action::Hire { cell });
        self.hires.push(StagedHire { worker, cell });
    }

    pub fn record_move(&mut self, candidate: Candidate) {
        self.actions.push(Action::Move {
            worker: candidate.worker,
            direction: candidate.direction,
        });
        self.moves.push(StagedMove {
            worker: candidate.worker,
            from: candidate.from,
            to: candidate.to,
            direction: candidate.direction,
        });
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn hires(&self) -> &[StagedHire] {
        &self.hires
    }

    pub fn moves(&self) -> &[StagedMove] {
        &self.moves
    }

    /// Cells that end the day under a worker because of this plan.
    pub fn destinations(&self) -> impl Iterator<Item = Cell> + '_ {
        self.hires
            .iter()
            .map(|hire| hire.cell)
            .chain(self.moves.iter().map(|step| step.to))
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}
