use std::collections::BTreeMap;

use binairo_core::Grid;
use log::{debug, trace, warn};

use crate::{
    SolverError, Step,
    technique::{self, BoxedTechnique, TechniqueKind},
};

/// Where and why a solve run hit a contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{reason}")]
pub struct Contradiction {
    /// Why the grid cannot be completed.
    pub reason: SolverError,
    /// The step that failed to apply, or the applied step that made the grid
    /// break a rule.
    ///
    /// `None` when the clues themselves are invalid or a technique detected
    /// the contradiction while scanning.
    pub step: Option<Step>,
}

/// The state of a solve run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SolveStatus {
    /// Techniques are still being applied.
    Running,
    /// The grid is complete and satisfies every rule.
    Solved,
    /// The grid cannot be completed.
    Contradiction(Contradiction),
    /// No technique applies, but the grid is incomplete.
    Stalled,
}

impl SolveStatus {
    /// Returns `true` if the run has stopped.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }
}

/// The result of a solve run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// The terminal status.
    pub status: SolveStatus,
    /// The grid as the run left it.
    pub grid: Grid,
    /// Every applied step, in order.
    pub trace: Vec<Step>,
}

impl SolveOutcome {
    /// Counts how often each technique was applied.
    #[must_use]
    pub fn stats(&self) -> TechniqueStats {
        TechniqueStats::from_trace(&self.trace)
    }
}

/// Technique usage collected from a step trace.
///
/// # Examples
///
/// ```
/// use binairo_solver::{PropagationEngine, technique::TechniqueKind};
///
/// let engine = PropagationEngine::with_all_techniques();
/// let outcome = engine.solve("00..\n....\n....\n....".parse()?);
/// let stats = outcome.stats();
/// assert!(stats.applications(TechniqueKind::AvoidThree) > 0);
/// assert_eq!(stats.total_steps(), outcome.trace.len());
/// # Ok::<(), binairo_core::GridError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechniqueStats {
    applications: BTreeMap<TechniqueKind, usize>,
    total_steps: usize,
}

impl TechniqueStats {
    /// Counts the steps of `trace` per technique.
    #[must_use]
    pub fn from_trace(trace: &[Step]) -> Self {
        let mut applications = BTreeMap::new();
        for step in trace {
            *applications.entry(step.technique).or_insert(0) += 1;
        }
        Self {
            applications,
            total_steps: trace.len(),
        }
    }

    /// Returns how many steps `kind` produced.
    #[must_use]
    pub fn applications(&self, kind: TechniqueKind) -> usize {
        self.applications.get(&kind).copied().unwrap_or(0)
    }

    /// Iterates over the techniques that were applied, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (TechniqueKind, usize)> + '_ {
        self.applications.iter().map(|(&kind, &count)| (kind, count))
    }

    /// Returns the total number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Returns the number of distinct techniques that were applied.
    #[must_use]
    pub fn variety(&self) -> usize {
        self.applications.len()
    }

    /// Returns `true` if any technique was applied.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.total_steps > 0
    }
}

/// An engine that fills a grid with human deduction techniques.
///
/// Each pass tries the techniques in priority order. The first technique that
/// proposes a new assignment has all of its proposals applied, and the next
/// pass starts again from the cheapest technique. The run ends when the grid is
/// complete, a contradiction is found, or no technique makes progress.
///
/// # Examples
///
/// ```
/// use binairo_core::Grid;
/// use binairo_solver::{PropagationEngine, SolveStatus};
///
/// let engine = PropagationEngine::with_all_techniques();
/// let grid: Grid = "
///     000...
///     ......
///     ......
///     ......
///     ......
///     ......
/// "
/// .parse()?;
///
/// let outcome = engine.solve(grid);
/// assert!(outcome.status.is_contradiction());
/// assert!(outcome.trace.is_empty());
/// # Ok::<(), binairo_core::GridError>(())
/// ```
///
/// # Studying stalls
///
/// ```
/// use binairo_solver::{PropagationEngine, technique};
///
/// // Without forced moves, only line-local rules are available.
/// let engine = PropagationEngine::new(technique::line_techniques());
/// assert_eq!(engine.techniques().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    techniques: Vec<BoxedTechnique>,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::with_all_techniques()
    }
}

impl PropagationEngine {
    /// Creates an engine that applies `techniques` in the given order.
    #[must_use]
    pub fn new(techniques: Vec<BoxedTechnique>) -> Self {
        Self { techniques }
    }

    /// Creates an engine with the four standard techniques.
    #[must_use]
    pub fn with_all_techniques() -> Self {
        Self::new(technique::all_techniques())
    }

    /// Returns the configured techniques in application order.
    #[must_use]
    pub fn techniques(&self) -> &[BoxedTechnique] {
        &self.techniques
    }

    /// Runs one pass over the techniques.
    ///
    /// Applies every proposal of the first technique that makes progress and
    /// appends the applied steps to `steps`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(kind))` - `kind` made progress
    /// * `Ok(None)` - No technique made progress
    ///
    /// # Errors
    ///
    /// Returns a [`Contradiction`] if a proposal conflicts with the grid, an
    /// assignment makes the grid break a rule, or a technique reports an
    /// error. The rules are checked after every assignment, so the pass stops
    /// at the first violating step. Steps applied up to and including that
    /// step stay in `steps`.
    pub fn step(
        &self,
        grid: &mut Grid,
        steps: &mut Vec<Step>,
    ) -> Result<Option<TechniqueKind>, Contradiction> {
        for technique in &self.techniques {
            let kind = technique.kind();
            let proposals = technique
                .find_proposals(grid)
                .map_err(|reason| Contradiction { reason, step: None })?;

            let mut progressed = false;
            for proposal in proposals {
                let step = proposal.into_step(kind);
                match grid.set(step.position, step.value) {
                    Ok(true) => {
                        trace!("{step}");
                        steps.push(step);
                        progressed = true;
                        grid.check_invariants().map_err(|err| Contradiction {
                            reason: err.into(),
                            step: Some(step),
                        })?;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        return Err(Contradiction {
                            reason: err.into(),
                            step: Some(step),
                        });
                    }
                }
            }

            if progressed {
                return Ok(Some(kind));
            }
        }
        Ok(None)
    }

    /// Solves `grid` until a terminal status is reached.
    ///
    /// Never fails: invalid input is reported as
    /// [`SolveStatus::Contradiction`], and a puzzle beyond the techniques as
    /// [`SolveStatus::Stalled`].
    #[must_use]
    pub fn solve(&self, grid: Grid) -> SolveOutcome {
        let mut outcome = SolveOutcome {
            status: SolveStatus::Running,
            grid,
            trace: Vec::new(),
        };

        if let Err(err) = outcome.grid.check_invariants() {
            debug!("clues break a rule: {err}");
            outcome.status = SolveStatus::Contradiction(Contradiction {
                reason: err.into(),
                step: None,
            });
            return outcome;
        }

        let max_passes = outcome.grid.size() * outcome.grid.size() + 1;
        for pass in 0..max_passes {
            if outcome.grid.is_complete() {
                debug!("solved after {pass} passes");
                outcome.status = SolveStatus::Solved;
                return outcome;
            }
            let before = outcome.trace.len();
            match self.step(&mut outcome.grid, &mut outcome.trace) {
                Ok(Some(kind)) => {
                    debug!(
                        "pass {pass}: {kind} placed {} cells, {} unknown",
                        outcome.trace.len() - before,
                        outcome.grid.unknown_count()
                    );
                }
                Ok(None) => {
                    debug!(
                        "stalled after {pass} passes with {} unknown cells",
                        outcome.grid.unknown_count()
                    );
                    outcome.status = SolveStatus::Stalled;
                    return outcome;
                }
                Err(contradiction) => {
                    debug!("contradiction in pass {pass}: {contradiction}");
                    outcome.status = SolveStatus::Contradiction(contradiction);
                    return outcome;
                }
            }
        }

        if outcome.grid.is_complete() {
            outcome.status = SolveStatus::Solved;
        } else {
            warn!("gave up after {max_passes} passes");
            outcome.status = SolveStatus::Stalled;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use binairo_core::{Cell, InvariantViolation, Line, Position, Value};
    use proptest::prelude::*;

    use super::*;
    use crate::{Justification, Proposal, technique::Technique};

    const SOLVED: &str = "
        101001
        010110
        100101
        011010
        010101
        101010
    ";

    const SCENARIO: &str = "
        1.1..1
        ...11.
        .00...
        ....1.
        0....1
        1.1..0
    ";

    fn solve(s: &str) -> SolveOutcome {
        PropagationEngine::with_all_techniques().solve(s.parse().unwrap())
    }

    #[test]
    fn test_full_grid_is_solved_without_steps() {
        let outcome = solve(SOLVED);
        assert!(outcome.status.is_solved());
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.grid, SOLVED.parse::<Grid>().unwrap());
    }

    #[test]
    fn test_scenario_is_solved() {
        let outcome = solve(SCENARIO);
        assert!(outcome.status.is_solved());
        assert_eq!(outcome.grid.to_rows(), SOLVED.parse::<Grid>().unwrap().to_rows());
        assert_eq!(outcome.trace.len(), 23);
        assert_eq!(outcome.grid.check_invariants(), Ok(()));

        let stats = outcome.stats();
        assert_eq!(stats.total_steps(), 23);
        assert_eq!(stats.applications(TechniqueKind::DuplicatePrevention), 2);
        assert_eq!(stats.applications(TechniqueKind::ForcedMove), 0);
    }

    #[test]
    fn test_eight_by_eight_uses_every_technique() {
        let outcome = solve(
            "
            11.1....
            .00..1..
            .....1.0
            0.1.1...
            ........
            ........
            .1...1..
            0...1...
        ",
        );
        let expected: Grid = "
            11010010
            10010101
            01101100
            01101010
            10010011
            00110101
            11001100
            00101011
        "
        .parse()
        .unwrap();
        assert!(outcome.status.is_solved());
        assert_eq!(outcome.grid.to_rows(), expected.to_rows());
        assert_eq!(outcome.trace.len(), 49);
        let stats = outcome.stats();
        assert_eq!(stats.variety(), TechniqueKind::COUNT);
        assert!(stats.applications(TechniqueKind::ForcedMove) > 0);
    }

    #[test]
    fn test_scenario_starts_with_cheap_techniques() {
        let outcome = solve(SCENARIO);
        assert!(matches!(
            outcome.trace[0].technique,
            TechniqueKind::AvoidThree | TechniqueKind::Balance
        ));
        let first_duplicate = outcome
            .trace
            .iter()
            .position(|step| step.technique == TechniqueKind::DuplicatePrevention)
            .unwrap();
        assert!(outcome.trace[..first_duplicate].iter().all(|step| {
            matches!(
                step.technique,
                TechniqueKind::AvoidThree | TechniqueKind::Balance
            )
        }));
        assert_eq!(
            outcome.trace[first_duplicate].justification,
            crate::Justification::Distinct {
                line: Line::Column { index: 4 },
                other: Line::Column { index: 1 },
            }
        );
    }

    #[test]
    fn test_clues_with_three_in_a_row_are_contradiction() {
        let outcome = solve(
            "
            000...
            ......
            ......
            ......
            ......
            ......
        ",
        );
        let SolveStatus::Contradiction(contradiction) = outcome.status else {
            panic!("expected contradiction, got {:?}", outcome.status);
        };
        assert!(matches!(
            contradiction.reason,
            SolverError::Invariant(InvariantViolation::ThreeInARow { .. })
        ));
        assert_eq!(contradiction.step, None);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_rule_break_records_violating_step() {
        // (C,1) closes a run whichever value it takes
        let outcome = solve(
            "
            00.11.
            ......
            ......
            ......
            ......
            ......
        ",
        );
        let SolveStatus::Contradiction(contradiction) = outcome.status else {
            panic!("expected contradiction, got {:?}", outcome.status);
        };
        assert!(matches!(
            contradiction.reason,
            SolverError::Invariant(InvariantViolation::ThreeInARow { .. })
        ));
        let step = contradiction.step.unwrap();
        assert_eq!(step.position, Position::new(0, 2));
        assert_eq!(step.technique, TechniqueKind::AvoidThree);
        assert_eq!(outcome.trace, [step]);
    }

    #[test]
    fn test_rule_break_stops_the_batch() {
        // the quota of row 1 fills (B,1) first, which closes a run in column B
        let engine = PropagationEngine::new(vec![Box::new(technique::Balance::new())]);
        let grid: Grid = "
            1.1.1.
            .0....
            .0....
            ......
            ......
            ......
        "
        .parse()
        .unwrap();
        let outcome = engine.solve(grid);
        let SolveStatus::Contradiction(contradiction) = outcome.status else {
            panic!("expected contradiction, got {:?}", outcome.status);
        };
        assert_eq!(
            contradiction.reason,
            SolverError::Invariant(InvariantViolation::ThreeInARow {
                line: Line::Column { index: 1 },
                start: Position::new(0, 1),
                value: Value::Zero,
            })
        );
        let step = contradiction.step.unwrap();
        assert_eq!(step.position, Position::new(0, 1));
        assert_eq!(outcome.trace, [step]);
        assert_eq!(outcome.grid.get(Position::new(0, 3)), Cell::Unknown);
    }

    /// Proposes the opposite of the first clue.
    #[derive(Debug, Clone)]
    struct Contrary;

    impl Technique for Contrary {
        fn kind(&self) -> TechniqueKind {
            TechniqueKind::AvoidThree
        }

        fn clone_box(&self) -> BoxedTechnique {
            Box::new(self.clone())
        }

        fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError> {
            let proposals = grid
                .positions()
                .find_map(|pos| Some((pos, grid.get(pos).value()?)))
                .map(|(pos, value)| {
                    Proposal::new(
                        pos,
                        value.opposite(),
                        Justification::Refutation { rejected: value },
                    )
                });
            Ok(proposals.into_iter().collect())
        }
    }

    #[test]
    fn test_conflict_records_failing_step() {
        let engine = PropagationEngine::new(vec![Box::new(Contrary)]);
        let outcome = engine.solve(
            "
            ..1...
            ......
            ......
            ......
            ......
            ......
        "
            .parse()
            .unwrap(),
        );
        let SolveStatus::Contradiction(contradiction) = outcome.status else {
            panic!("expected contradiction, got {:?}", outcome.status);
        };
        assert!(matches!(contradiction.reason, SolverError::Conflict(_)));
        let step = contradiction.step.unwrap();
        assert_eq!(step.position, Position::new(0, 2));
        assert_eq!(step.value, Value::Zero);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_technique_error_is_contradiction() {
        let outcome = solve(
            "
            .0...0
            1.....
            ......
            ......
            ......
            1.....
        ",
        );
        assert_eq!(
            outcome.status,
            SolveStatus::Contradiction(Contradiction {
                reason: SolverError::NoValue {
                    position: Position::new(0, 0)
                },
                step: None,
            })
        );
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_sparse_grid_stalls() {
        let outcome = solve(
            "
            00....
            ......
            ......
            ......
            ......
            ......
        ",
        );
        assert!(outcome.status.is_stalled());
        assert!(!outcome.trace.is_empty());
        assert!(!outcome.grid.is_complete());
        assert_eq!(outcome.trace[0].position, Position::new(0, 2));
        assert_eq!(outcome.trace[0].value, Value::One);
        assert_eq!(outcome.trace[0].technique, TechniqueKind::AvoidThree);
    }

    #[test]
    fn test_line_techniques_alone_stall_where_forced_move_progresses() {
        let grid: Grid = "
            ......
            ......
            .0..0.
            ......
            ......
            1...1.
        "
        .parse()
        .unwrap();

        let lines_only = PropagationEngine::new(technique::line_techniques()).solve(grid.clone());
        assert!(lines_only.status.is_stalled());
        assert!(lines_only.trace.is_empty());

        let full = PropagationEngine::with_all_techniques().solve(grid);
        assert_eq!(full.trace[0].technique, TechniqueKind::ForcedMove);
        assert_eq!(full.trace[0].position, Position::new(5, 5));
        assert_eq!(full.trace[0].value, Value::Zero);
    }

    #[test]
    fn test_step_reports_progressing_technique() {
        let engine = PropagationEngine::with_all_techniques();
        let mut grid: Grid = SCENARIO.parse().unwrap();
        let mut steps = vec![];
        let kind = engine.step(&mut grid, &mut steps).unwrap();
        assert_eq!(kind, Some(TechniqueKind::AvoidThree));
        assert!(!steps.is_empty());
        assert!(steps.iter().all(|s| s.technique == TechniqueKind::AvoidThree));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!SolveStatus::Running.is_terminal());
        assert!(SolveStatus::Solved.is_terminal());
        assert!(SolveStatus::Stalled.is_terminal());
    }

    fn masked_solution() -> impl Strategy<Value = Grid> {
        prop::collection::vec(any::<bool>(), 36).prop_map(|mask| {
            let solved: Grid = SOLVED.parse().unwrap();
            let cells = solved
                .positions()
                .zip(mask)
                .map(|(pos, keep)| if keep { solved.get(pos) } else { Cell::Unknown })
                .collect();
            Grid::from_cells(6, cells).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_masked_solution_never_contradicts(grid in masked_solution()) {
            let outcome = PropagationEngine::with_all_techniques().solve(grid);
            prop_assert!(!outcome.status.is_contradiction());
        }

        #[test]
        fn prop_clues_are_preserved(grid in masked_solution()) {
            let outcome = PropagationEngine::with_all_techniques().solve(grid.clone());
            for pos in grid.positions() {
                if grid.get(pos).is_determined() {
                    prop_assert_eq!(outcome.grid.get(pos), grid.get(pos));
                    prop_assert!(outcome.grid.is_given(pos));
                }
            }
        }

        #[test]
        fn prop_solve_is_deterministic(grid in masked_solution()) {
            let engine = PropagationEngine::with_all_techniques();
            let first = engine.solve(grid.clone());
            let second = engine.solve(grid);
            prop_assert_eq!(first.status, second.status);
            prop_assert_eq!(first.trace, second.trace);
            prop_assert_eq!(first.grid, second.grid);
        }

        #[test]
        fn prop_solved_grid_keeps_every_rule(grid in masked_solution()) {
            let outcome = PropagationEngine::with_all_techniques().solve(grid);
            if outcome.status.is_solved() {
                prop_assert!(outcome.grid.is_complete());
                prop_assert_eq!(outcome.grid.check_invariants(), Ok(()));
            }
        }

        #[test]
        fn prop_trace_matches_grid(grid in masked_solution()) {
            let outcome = PropagationEngine::with_all_techniques().solve(grid.clone());
            prop_assert_eq!(
                outcome.trace.len(),
                grid.unknown_count() - outcome.grid.unknown_count()
            );
            for step in &outcome.trace {
                prop_assert!(grid.get(step.position).is_unknown());
                prop_assert_eq!(outcome.grid.get(step.position).value(), Some(step.value));
            }
        }
    }
}
