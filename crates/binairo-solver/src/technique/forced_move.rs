use binairo_core::{Grid, Position, Value};
use log::trace;

use super::{BoxedTechnique, Technique, TechniqueKind, line_techniques};
use crate::{Justification, Proposal, SolverError};

/// A technique that rejects values leading to a contradiction.
///
/// For each unknown cell in row-major order, both values are tried on a copy
/// of the grid, and the single-line techniques are propagated to a fixed
/// point. If exactly one value breaks a rule, the cell takes the other one.
/// The first such cell is reported.
///
/// Hypotheses are never nested: propagation inside a hypothesis does not try
/// further forced moves. When both values of a cell fail, the technique
/// reports [`SolverError::NoValue`].
#[derive(Debug, Clone)]
pub struct ForcedMove {
    techniques: Vec<BoxedTechnique>,
}

impl Default for ForcedMove {
    fn default() -> Self {
        Self::new()
    }
}

impl ForcedMove {
    /// Creates a new `ForcedMove` technique propagating the line techniques.
    #[must_use]
    pub fn new() -> Self {
        Self {
            techniques: line_techniques(),
        }
    }

    fn refutes(&self, grid: &Grid, pos: Position, value: Value) -> bool {
        let mut hypothesis = grid.clone();
        match self.propagate(&mut hypothesis, pos, value) {
            Ok(()) => false,
            Err(err) => {
                trace!("{pos} = {value} refuted: {err}");
                true
            }
        }
    }

    fn propagate(&self, grid: &mut Grid, pos: Position, value: Value) -> Result<(), SolverError> {
        grid.set(pos, value)?;
        grid.check_invariants()?;
        loop {
            let mut changed = false;
            for technique in &self.techniques {
                for proposal in technique.find_proposals(grid)? {
                    changed |= grid.set(proposal.position, proposal.value)?;
                }
                grid.check_invariants()?;
            }
            if !changed {
                return Ok(());
            }
        }
    }
}

impl Technique for ForcedMove {
    fn kind(&self) -> TechniqueKind {
        TechniqueKind::ForcedMove
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(self.clone())
    }

    fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError> {
        for pos in grid.unknown_positions() {
            let zero_fails = self.refutes(grid, pos, Value::Zero);
            let one_fails = self.refutes(grid, pos, Value::One);
            let rejected = match (zero_fails, one_fails) {
                (true, true) => return Err(SolverError::NoValue { position: pos }),
                (true, false) => Value::Zero,
                (false, true) => Value::One,
                (false, false) => continue,
            };
            return Ok(vec![Proposal::new(
                pos,
                rejected.opposite(),
                Justification::Refutation { rejected },
            )]);
        }
        Ok(vec![])
    }
}
