use binairo_core::{Grid, Line};

use super::{BoxedTechnique, Technique, TechniqueKind};
use crate::{Justification, Proposal, SolverError, technique_step::push_unique};

/// A technique that prevents three consecutive equal values.
///
/// In every window of three adjacent cells of a line, if two cells hold the
/// same value and the third is unknown, the third must take the opposite
/// value. This covers the patterns `xx_`, `_xx` and `x_x`.
///
/// # Examples
///
/// ```
/// use binairo_core::{Position, Value};
/// use binairo_solver::technique::{AvoidThree, Technique};
///
/// let grid = "
///     00....
///     ......
///     ......
///     ......
///     ......
///     ......
/// "
/// .parse()?;
/// let proposals = AvoidThree::new().find_proposals(&grid)?;
/// assert_eq!(proposals.len(), 1);
/// assert_eq!(proposals[0].position, Position::new(0, 2));
/// assert_eq!(proposals[0].value, Value::One);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AvoidThree;

impl AvoidThree {
    /// Creates a new `AvoidThree` technique.
    #[must_use]
    pub const fn new() -> Self {
        AvoidThree
    }
}

impl Technique for AvoidThree {
    fn kind(&self) -> TechniqueKind {
        TechniqueKind::AvoidThree
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError> {
        let mut proposals = vec![];
        for line in Line::all(grid.size()) {
            let cells = grid.line(line).collect::<Vec<_>>();
            for window in cells.windows(3) {
                let &[(p0, c0), (p1, c1), (p2, c2)] = window else {
                    continue;
                };
                let (target, pair, value) = match (c0.value(), c1.value(), c2.value()) {
                    (Some(a), Some(b), None) if a == b => (p2, [p0, p1], a),
                    (None, Some(a), Some(b)) if a == b => (p0, [p1, p2], a),
                    (Some(a), None, Some(b)) if a == b => (p1, [p0, p2], a),
                    _ => continue,
                };
                push_unique(
                    &mut proposals,
                    Proposal::new(
                        target,
                        value.opposite(),
                        Justification::Pair { line, cells: pair },
                    ),
                );
            }
        }
        Ok(proposals)
    }
}
