pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod hiring;
pub mod io;
pub mod judge;
pub mod plan;
pub mod reduce;
pub mod search;
pub mod weather;
pub mod world;

use action::Action;
use engine::Controller;
use error::JudgeError;
use io::frame::{make_frame, Frame};
use judge::Judge;
use world::Cell;

/// Result of one judged day.
#[derive(Clone, Debug)]
pub struct DayReport {
    pub day: u64,
    pub actions: Vec<Action>,
    pub frame: Frame,
}

/// Run a single judged day end to end.
///
/// The judge drops `snowfall` on its board, the controller plans and commits
/// its actions, the judge validates and applies them in emitted order, sweeps
/// snow under workers and charges the day. The returned [`Frame`] captures the
/// judge's view after charging.
pub fn judge_day(
    controller: &mut Controller,
    judge: &mut Judge,
    snowfall: &[Cell],
    last: bool,
) -> Result<DayReport, JudgeError> {
    let day = judge.start_day(snowfall);
    debug_assert_eq!(day, controller.day(), "controller and judge out of step");

    let actions = controller.next_day(snowfall);
    judge.submit_all(&actions)?;
    judge.end_day();

    let frame = make_frame(day, judge, snowfall, &actions, last);
    Ok(DayReport {
        day,
        actions,
        frame,
    })
}
