//! Line protocol spoken between the judge and the contestant process.
//!
//! Judge to contestant: board size, salary and fine (one integer each), then
//! per day a count `K` followed by `2K` integers (row, col pairs). Contestant
//! to judge: a count `C` followed by `C` command lines. The judge writes one
//! integer per line; any whitespace separation is accepted here.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::action::{Action, MAX_COMMAND_NUMBER};
use crate::config::RunParams;
use crate::error::ProtocolError;
use crate::world::Cell;

/// Largest board a command line can address: rows and columns stop at 99.
pub const MAX_BOARD_SIZE: u32 = MAX_COMMAND_NUMBER + 1;

/// Whitespace-separated integer reader over any buffered source.
pub struct TokenReader<R> {
    reader: R,
    tokens: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            tokens: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>, ProtocolError> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.tokens.pop_front())
    }

    fn next_int(&mut self, what: &'static str) -> Result<i64, ProtocolError> {
        let token = self
            .next_token()?
            .ok_or(ProtocolError::UnexpectedEof { what })?;
        token
            .parse()
            .map_err(|_| ProtocolError::NotAnInteger { what, token })
    }

    fn next_bounded(&mut self, what: &'static str, limit: i64) -> Result<u32, ProtocolError> {
        let value = self.next_int(what)?;
        if !(0..limit).contains(&value) {
            return Err(ProtocolError::OutOfRange { what, value, limit });
        }
        Ok(value as u32)
    }

    /// Read the three initialisation integers.
    pub fn read_init(&mut self) -> Result<RunParams, ProtocolError> {
        let limit = i64::from(u32::MAX);
        Ok(RunParams {
            board_size: self.next_bounded("board size", i64::from(MAX_BOARD_SIZE) + 1)?,
            salary: self.next_bounded("salary", limit)?,
            fine: self.next_bounded("snow fine", limit)?,
        })
    }

    /// Read one day's snowfall. Returns `None` when the input ends cleanly
    /// before the day's count.
    pub fn read_day(&mut self, board_size: u32) -> Result<Option<Vec<Cell>>, ProtocolError> {
        let Some(token) = self.next_token()? else {
            return Ok(None);
        };
        let what = "snowfall count";
        let count: i64 = token
            .parse()
            .map_err(|_| ProtocolError::NotAnInteger { what, token })?;
        if count < 0 {
            return Err(ProtocolError::OutOfRange {
                what,
                value: count,
                limit: i64::MAX,
            });
        }

        let limit = i64::from(board_size);
        let mut cells = Vec::with_capacity(count.min(limit * limit) as usize);
        for _ in 0..count {
            let row = self.next_bounded("snowfall row", limit)?;
            let col = self.next_bounded("snowfall column", limit)?;
            cells.push(Cell::new(row, col));
        }
        Ok(Some(cells))
    }
}

/// Write a day's command count and command lines, then flush.
pub fn write_day<W: Write>(out: &mut W, actions: &[Action]) -> std::io::Result<()> {
    writeln!(out, "{}", actions.len())?;
    for action in actions {
        writeln!(out, "{}", action)?;
    }
    out.flush()
}

/// Encode the initialisation block the way the judge sends it.
pub fn encode_init(params: &RunParams) -> String {
    format!("{}\n{}\n{}\n", params.board_size, params.salary, params.fine)
}

/// Encode one day's snowfall the way the judge sends it.
pub fn encode_day(snowfall: &[Cell]) -> String {
    let mut encoded = format!("{}\n", snowfall.len());
    for cell in snowfall {
        encoded.push_str(&format!("{}\n{}\n", cell.row, cell.col));
    }
    encoded
}
