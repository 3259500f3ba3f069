use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::action::Action;
use crate::config::RunParams;
use crate::judge::{Judge, Totals};
use crate::world::Cell;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FrameWorldMeta {
    pub board_size: u32,
    pub salary: u32,
    pub fine: u32,
}

impl From<&RunParams> for FrameWorldMeta {
    fn from(params: &RunParams) -> Self {
        Self {
            board_size: params.board_size,
            salary: params.salary,
            fine: params.fine,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FrameTotals {
    pub fine: u64,
    pub salary: u64,
    pub score: u64,
}

impl From<Totals> for FrameTotals {
    fn from(totals: Totals) -> Self {
        Self {
            fine: totals.fine,
            salary: totals.salary,
            score: totals.score(),
        }
    }
}

/// One day of a judged run, as streamed to viewers.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub t: u64,
    pub world: FrameWorldMeta,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub snowfall: Vec<Cell>,
    pub workers: Vec<Cell>,
    pub snow: u64,
    pub totals: FrameTotals,
    #[serde(rename = "final")]
    pub last: bool,
}

/// Capture the judge's state at the end of day `t`.
pub fn make_frame(t: u64, judge: &Judge, snowfall: &[Cell], actions: &[Action], last: bool) -> Frame {
    Frame {
        t,
        world: FrameWorldMeta::from(judge.params()),
        actions: actions.to_vec(),
        snowfall: snowfall.to_vec(),
        workers: judge.workers().to_vec(),
        snow: judge.uncleared(),
        totals: FrameTotals::from(judge.totals()),
        last,
    }
}

impl Frame {
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}
