use binairo_core::{Grid, Line, Value};

use super::{BoxedTechnique, Technique, TechniqueKind};
use crate::{Justification, Proposal, SolverError};

/// A technique that completes lines whose quota of one value is used up.
///
/// Every line holds exactly as many zeros as ones. Once a line holds half of
/// its cells with one value, every remaining unknown cell takes the other.
///
/// # Examples
///
/// ```
/// use binairo_core::Value;
/// use binairo_solver::technique::{Balance, Technique};
///
/// let grid = "
///     1.1.1.
///     ......
///     ......
///     ......
///     ......
///     ......
/// "
/// .parse()?;
/// let proposals = Balance::new().find_proposals(&grid)?;
/// assert_eq!(proposals.len(), 3);
/// assert!(proposals.iter().all(|p| p.value == Value::Zero));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Balance;

impl Balance {
    /// Creates a new `Balance` technique.
    #[must_use]
    pub const fn new() -> Self {
        Balance
    }
}

impl Technique for Balance {
    fn kind(&self) -> TechniqueKind {
        TechniqueKind::Balance
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError> {
        let half = grid.half();
        let mut proposals = vec![];
        for line in Line::all(grid.size()) {
            if grid.unknowns(line) == 0 {
                continue;
            }
            for full in Value::ALL {
                if grid.count(line, full) != half {
                    continue;
                }
                let justification = Justification::Quota { line, full };
                proposals.extend(
                    grid.line(line)
                        .filter(|(_, cell)| cell.is_unknown())
                        .map(|(pos, _)| Proposal::new(pos, full.opposite(), justification)),
                );
            }
        }
        Ok(proposals)
    }
}
