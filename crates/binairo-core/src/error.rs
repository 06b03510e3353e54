use crate::{Line, Position, Value};

/// An assignment that contradicts a value already held by the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot set {position} to {attempted}: it already holds {existing}")]
pub struct ConflictError {
    /// The cell that was assigned.
    pub position: Position,
    /// The value the cell already held.
    pub existing: Value,
    /// The rejected value.
    pub attempted: Value,
}

/// A violated Binairo rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvariantViolation {
    /// Three consecutive equal values in a line.
    #[display("{line} has three consecutive {value}s starting at {start}")]
    ThreeInARow {
        /// The offending line.
        line: Line,
        /// The first cell of the run.
        start: Position,
        /// The repeated value.
        value: Value,
    },
    /// A line holds more than half of its cells with one value.
    #[display("{line} holds {count} {value}s, more than half of its cells")]
    Imbalance {
        /// The offending line.
        line: Line,
        /// The over-represented value.
        value: Value,
        /// How many cells hold the value.
        count: usize,
    },
    /// Two fully determined lines of the same kind are identical.
    #[display("{first} and {second} are identical")]
    DuplicateLine {
        /// The earlier line.
        first: Line,
        /// The later line.
        second: Line,
    },
}

/// Errors produced while building a grid from external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// The grid size is zero or odd.
    #[display("grid size {size} must be positive and even")]
    InvalidSize {
        /// The rejected size.
        size: usize,
    },
    /// A row does not have as many cells as the grid has rows.
    #[display("row {} has {len} cells, expected {size}", row + 1)]
    RaggedRow {
        /// Zero-based index of the row.
        row: usize,
        /// Number of cells in the row.
        len: usize,
        /// Expected number of cells.
        size: usize,
    },
    /// A clue is neither `0` nor `1`.
    #[display("invalid clue {value} at {position}")]
    InvalidClue {
        /// The cell holding the clue.
        position: Position,
        /// The rejected clue.
        value: u8,
    },
    /// A character in the text form is not a cell symbol.
    #[display("invalid cell symbol {symbol:?}")]
    InvalidSymbol {
        /// The rejected character.
        symbol: char,
    },
}
