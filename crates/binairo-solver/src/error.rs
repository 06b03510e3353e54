use binairo_core::{ConflictError, InvariantViolation, Line, Position};

/// Reasons a grid cannot be completed.
///
/// Techniques return these when they detect an invalid state, and the
/// [`PropagationEngine`](crate::PropagationEngine) turns every one of them into
/// a [`SolveStatus::Contradiction`](crate::SolveStatus::Contradiction).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SolverError {
    /// An assignment contradicts a determined cell.
    #[display("conflicting assignment: {_0}")]
    Conflict(#[from] ConflictError),
    /// The grid breaks a Binairo rule.
    #[display("rule violated: {_0}")]
    Invariant(#[from] InvariantViolation),
    /// The only completion of a line is identical to a complete line.
    #[display("the only completion of {line} copies {other}")]
    DuplicateCompletion {
        /// The line being completed.
        line: Line,
        /// The complete line it would copy.
        other: Line,
    },
    /// Both values of an unknown cell lead to a contradiction.
    #[display("neither value fits {position}")]
    NoValue {
        /// The cell without a consistent value.
        position: Position,
    },
}
