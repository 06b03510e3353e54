use binairo_core::{Cell, Grid, Line, Value};
use tinyvec::ArrayVec;

use super::{BoxedTechnique, Technique, TechniqueKind};
use crate::{Justification, Proposal, SolverError, technique_step::push_unique};

/// A technique that keeps nearly complete lines distinct from complete ones.
///
/// No two rows (or two columns) may be identical. A line with exactly two
/// unknown cells and no exhausted quota has two possible completions, one
/// per order of the missing `0` and `1`. If a complete line of the same kind
/// matches one of them, the other completion is forced.
///
/// A line whose quota is already used up has a single completion. When that
/// completion copies a complete line the grid is unsolvable, and the
/// technique reports [`SolverError::DuplicateCompletion`].
///
/// # Examples
///
/// ```
/// use binairo_core::{Position, Value};
/// use binairo_solver::technique::{DuplicatePrevention, Technique};
///
/// let grid = "
///     101010
///     10..10
///     ......
///     ......
///     ......
///     ......
/// "
/// .parse()?;
/// let proposals = DuplicatePrevention::new().find_proposals(&grid)?;
/// assert_eq!(proposals.len(), 2);
/// assert_eq!(proposals[0].position, Position::new(1, 2));
/// assert_eq!(proposals[0].value, Value::Zero);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicatePrevention;

impl DuplicatePrevention {
    /// Creates a new `DuplicatePrevention` technique.
    #[must_use]
    pub const fn new() -> Self {
        DuplicatePrevention
    }
}

impl Technique for DuplicatePrevention {
    fn kind(&self) -> TechniqueKind {
        TechniqueKind::DuplicatePrevention
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError> {
        let half = grid.half();
        let mut proposals = vec![];
        for line in Line::all(grid.size()) {
            if !(1..=2).contains(&grid.unknowns(line)) {
                continue;
            }
            let cells = grid.line_cells(line);
            let gaps = cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_unknown())
                .map(|(i, _)| i)
                .collect::<ArrayVec<[usize; 2]>>();

            let full = Value::ALL
                .into_iter()
                .find(|&value| grid.count(line, value) == half);

            for other in line.kind().lines(grid.size()) {
                if other == line {
                    continue;
                }
                let Some(values) = grid.line_values(other) else {
                    continue;
                };
                if !agrees_outside_gaps(&cells, &values) {
                    continue;
                }
                if let Some(full) = full {
                    if gaps.iter().all(|&i| values[i] == full.opposite()) {
                        return Err(SolverError::DuplicateCompletion { line, other });
                    }
                    continue;
                }
                let &[first, second] = gaps.as_slice() else {
                    continue;
                };
                let (m1, m2) = (values[first], values[second]);
                if m1 == m2 {
                    continue;
                }
                let justification = Justification::Distinct { line, other };
                for (i, copied) in [(first, m1), (second, m2)] {
                    push_unique(
                        &mut proposals,
                        Proposal::new(line.position(i), copied.opposite(), justification),
                    );
                }
            }
        }
        Ok(proposals)
    }
}

fn agrees_outside_gaps(cells: &[Cell], values: &[Value]) -> bool {
    cells
        .iter()
        .zip(values)
        .all(|(cell, &value)| cell.value().is_none_or(|v| v == value))
}
