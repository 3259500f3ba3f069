use thiserror::Error;

use crate::action::ParseActionError;

/// Failures while decoding the line protocol from the judge.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of input while reading {what}")]
    UnexpectedEof { what: &'static str },

    #[error("expected an integer for {what}, found `{token}`")]
    NotAnInteger { what: &'static str, token: String },

    #[error("{what} must be within 0..{limit}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        limit: i64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Commands rejected by the judge. Each one ends the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JudgeError {
    #[error("time step = {day}, worker command = {index} (0-based indices). {source}")]
    MalformedCommand {
        day: u64,
        index: usize,
        #[source]
        source: ParseActionError,
    },

    #[error("time step = {day}, worker command = {index} (0-based indices). You are allowed to have at most {cap} workers.")]
    TooManyWorkers { day: u64, index: usize, cap: u32 },

    #[error("time step = {day}, worker command = {index} (0-based indices). You are trying to hire a worker at a cell outside the board.")]
    HireOutsideBoard { day: u64, index: usize },

    #[error("time step = {day}, worker command = {index} (0-based indices). You are trying to move worker which does not exist.")]
    UnknownWorker { day: u64, index: usize },

    #[error("time step = {day}, worker command = {index} (0-based indices). You are trying to execute a command for some worker more than once during the same turn.")]
    WorkerReused { day: u64, index: usize },

    #[error("time step = {day}, worker command = {index} (0-based indices). You are trying to move a worker outside the board.")]
    MoveOutsideBoard { day: u64, index: usize },

    #[error("judge has not started a day")]
    NoDayInProgress,
}

/// Engine settings that can never drive a sensible run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("throttle slice length must be at least one day")]
    EmptyThrottleSlice,

    #[error("bounded search needs a positive reach, got 0")]
    ZeroSearchReach,

    #[error("hard cap {0} exceeds the judge limit of {1} workers")]
    HardCapTooLarge(u32, u32),
}
