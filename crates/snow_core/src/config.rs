use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hiring::{HiringPolicy, Throttle, MAX_WORKERS};
use crate::search::SearchStrategy;

/// Run parameters announced by the judge before the first day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub board_size: u32,
    pub salary: u32,
    pub fine: u32,
}

impl RunParams {
    /// A fine below the wage means no clearing ever pays for itself.
    pub fn clearing_pays(&self) -> bool {
        self.fine >= self.salary
    }
}

/// Order in which the assignment pass visits snowed cells.
///
/// `RowMajor` rescans the whole board every day, O(board_size²) per day with no
/// bookkeeping. `PendingQueue` visits cells in the order their snow was first
/// reported and only touches pending cells, paying for it with removal work
/// when cells are cleared. The two orders can emit different action lists for
/// the same snowfall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    #[default]
    RowMajor,
    PendingQueue,
}

/// Tunable policy for the assignment engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hard_cap: u32,
    pub search: SearchStrategy,
    pub scan: ScanOrder,
    pub throttle: Option<Throttle>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hard_cap: MAX_WORKERS,
            search: SearchStrategy::default(),
            scan: ScanOrder::default(),
            throttle: None,
        }
    }
}

impl EngineConfig {
    /// Load a config JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open config file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize and validate a config document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader).context("invalid engine config json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hard_cap > MAX_WORKERS {
            return Err(ConfigError::HardCapTooLarge(self.hard_cap, MAX_WORKERS));
        }
        if let Some(throttle) = &self.throttle {
            if throttle.slice_days == 0 {
                return Err(ConfigError::EmptyThrottleSlice);
            }
        }
        match self.search {
            SearchStrategy::Diamond { radius: 0 } | SearchStrategy::Window { half_extent: 0 } => {
                Err(ConfigError::ZeroSearchReach)
            }
            _ => Ok(()),
        }
    }

    pub fn hiring_policy(&self) -> HiringPolicy {
        HiringPolicy::new(self.hard_cap, self.throttle)
    }
}
