//! Test utilities for technique implementations.
//!
//! This module provides [`TechniqueTester`], a fluent harness that applies a
//! technique to a grid parsed from text and checks the resulting placements.

use binairo_core::{Grid, Position, Value};

use crate::technique::Technique;

/// A test harness for verifying technique implementations.
///
/// `TechniqueTester` tracks the initial and current state of a grid, applies
/// techniques the way the engine does, and asserts on the changes.
///
/// # Panics
///
/// All methods panic with detailed messages on failure, using
/// `#[track_caller]` to report the correct source location.
#[derive(Debug)]
pub struct TechniqueTester {
    initial: Grid,
    current: Grid,
    last_proposals: usize,
}

impl TechniqueTester {
    /// Creates a new tester from an initial grid state.
    pub fn new(initial: Grid) -> Self {
        let current = initial.clone();
        Self {
            initial,
            current,
            last_proposals: 0,
        }
    }

    /// Creates a new tester from a grid string.
    ///
    /// # Panics
    ///
    /// Panics if the string cannot be parsed as a valid grid.
    #[track_caller]
    pub fn from_str(s: &str) -> Self {
        Self::new(s.parse().unwrap())
    }

    /// Applies the technique once and returns self for chaining.
    ///
    /// # Panics
    ///
    /// Panics if the technique returns an error, a proposal conflicts with
    /// the grid, or the grid breaks a rule afterwards.
    #[track_caller]
    pub fn apply_once<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        self.apply(technique);
        self
    }

    /// Applies the technique repeatedly until it makes no more progress.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`apply_once`](Self::apply_once).
    #[track_caller]
    pub fn apply_until_stuck<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        while self.apply(technique) {}
        self
    }

    #[track_caller]
    fn apply<T>(&mut self, technique: &T) -> bool
    where
        T: Technique,
    {
        let name = technique.name();
        let proposals = technique
            .find_proposals(&self.current)
            .unwrap_or_else(|err| panic!("{name} failed: {err}"));
        self.last_proposals = proposals.len();
        let mut changed = false;
        for proposal in proposals {
            changed |= self
                .current
                .set(proposal.position, proposal.value)
                .unwrap_or_else(|err| panic!("{name} proposed a conflict: {err}"));
        }
        if let Err(err) = self.current.check_invariants() {
            panic!("{name} broke a rule: {err}\n{}", self.current);
        }
        changed
    }

    /// Asserts that a cell was unknown initially and now holds `value`.
    #[track_caller]
    pub fn assert_placed(self, pos: Position, value: Value) -> Self {
        let initial = self.initial.get(pos);
        let current = self.current.get(pos);
        assert!(
            initial.is_unknown(),
            "Expected {pos} to be unknown initially, but it held {initial}"
        );
        assert_eq!(
            current.value(),
            Some(value),
            "Expected {value} at {pos}, found {current}\n{}",
            self.current
        );
        self
    }

    /// Asserts that a cell is unchanged from the initial state.
    #[track_caller]
    pub fn assert_no_change(self, pos: Position) -> Self {
        let initial = self.initial.get(pos);
        let current = self.current.get(pos);
        assert_eq!(
            initial, current,
            "Expected no change at {pos}, but {initial} became {current}"
        );
        self
    }

    /// Asserts that the whole grid is unchanged from the initial state.
    #[track_caller]
    pub fn assert_unchanged(self) -> Self {
        assert_eq!(
            self.initial, self.current,
            "Expected no change, but the grid became\n{}",
            self.current
        );
        self
    }

    /// Asserts how many proposals the last application returned.
    #[track_caller]
    pub fn assert_proposal_count(self, expected: usize) -> Self {
        assert_eq!(
            self.last_proposals, expected,
            "Expected {expected} proposals, got {}",
            self.last_proposals
        );
        self
    }
}
