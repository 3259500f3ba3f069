use tracing::debug;

use crate::plan::Plan;
use crate::world::World;

/// Commit a staged plan: every hire first, then every move.
pub fn apply(world: &mut World, plan: &Plan) {
    for hire in plan.hires() {
        let id = world.hire(hire.cell);
        debug_assert_eq!(id, hire.worker, "hire ids must stay dense");
        debug!(
            worker = id,
            row = hire.cell.row,
            col = hire.cell.col,
            "added worker"
        );
    }

    for step in plan.moves() {
        debug_assert_eq!(
            step.from.step(step.direction, world.board_size()),
            Some(step.to),
            "staged move is not a single step"
        );
        let vacated = world.relocate(step.worker, step.to);
        debug_assert_eq!(vacated, Some(step.from), "worker moved from a stale cell");
        debug!(
            worker = step.worker,
            from_row = step.from.row,
            from_col = step.from.col,
            to_row = step.to.row,
            to_col = step.to.col,
            direction = %step.direction.letter(),
            "moved worker"
        );
    }
}
