use std::fmt::{self, Display};

use binairo_core::{Line, Position, Value};

use crate::technique::TechniqueKind;

/// Why a technique assigned a value to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justification {
    /// Two equal cells in a window of three force the third cell.
    Pair {
        /// The line containing the window.
        line: Line,
        /// The two equal cells.
        cells: [Position; 2],
    },
    /// The line already holds half of its cells with `full`.
    Quota {
        /// The balanced line.
        line: Line,
        /// The value whose quota is used up.
        full: Value,
    },
    /// The other completion of the line would copy `other`.
    Distinct {
        /// The line being completed.
        line: Line,
        /// The complete line it must differ from.
        other: Line,
    },
    /// Assuming `rejected` leads to a contradiction.
    Refutation {
        /// The value that was refuted.
        rejected: Value,
    },
}

impl Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Justification::Pair { line, cells: [a, b] } => {
                write!(f, "{a} and {b} in {line} are equal")
            }
            Justification::Quota { line, full } => {
                write!(f, "{line} already holds all of its {full}s")
            }
            Justification::Distinct { line, other } => write!(f, "{line} must differ from {other}"),
            Justification::Refutation { rejected } => {
                write!(f, "{rejected} leads to a contradiction")
            }
        }
    }
}

/// A single assignment proposed by a technique.
///
/// Techniques never mutate the grid; they return proposals and the engine
/// applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Proposal {
    /// The cell to assign.
    pub position: Position,
    /// The value to assign.
    pub value: Value,
    /// The pattern that forces the value.
    pub justification: Justification,
}

impl Proposal {
    /// Creates a new proposal.
    #[must_use]
    pub const fn new(position: Position, value: Value, justification: Justification) -> Self {
        Self {
            position,
            value,
            justification,
        }
    }

    /// Attributes the proposal to a technique.
    #[must_use]
    pub const fn into_step(self, technique: TechniqueKind) -> Step {
        Step {
            position: self.position,
            value: self.value,
            technique,
            justification: self.justification,
        }
    }
}

/// One attributable deduction in a solve run.
///
/// The step trace of a run is the ordered list of these, in the order the
/// assignments were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// The assigned cell.
    pub position: Position,
    /// The assigned value.
    pub value: Value,
    /// The technique that justified the assignment.
    pub technique: TechniqueKind,
    /// The pattern the technique found.
    pub justification: Justification,
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Set {} = {} [{}]",
            self.position, self.value, self.technique
        )
    }
}

/// Appends a proposal unless the same assignment is already present.
///
/// Proposals that assign different values to the same cell are both kept; the
/// engine reports them as a conflict.
pub(crate) fn push_unique(proposals: &mut Vec<Proposal>, proposal: Proposal) {
    if !proposals
        .iter()
        .any(|p| p.position == proposal.position && p.value == proposal.value)
    {
        proposals.push(proposal);
    }
}
