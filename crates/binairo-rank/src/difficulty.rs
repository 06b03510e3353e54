use std::collections::BTreeMap;

use binairo_solver::technique::TechniqueKind;

/// Qualitative difficulty label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum DifficultyLabel {
    /// Score up to 3.
    #[display("easy")]
    Easy,
    /// Score up to 6.
    #[display("moderate")]
    Moderate,
    /// Score above 6.
    #[display("hard")]
    Hard,
}

/// The terms that make up a difficulty score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreComponents {
    /// Average technique weight, scaled and compressed for large grids.
    pub base: f64,
    /// Bonus for switching between advanced techniques.
    pub interaction: f64,
    /// Bonus for the number of distinct techniques.
    pub variety: f64,
    /// Bonus for the share of advanced steps.
    pub advanced: f64,
    /// Bonus for long traces.
    pub length: f64,
}

impl ScoreComponents {
    /// Returns the sum of all terms before clamping.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.base + self.interaction + self.variety + self.advanced + self.length
    }
}

/// The difficulty of a solve run.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    /// Score in `[1, 10]`, rounded to the nearest half.
    pub score: f64,
    /// Number of steps per technique.
    pub usage: BTreeMap<TechniqueKind, usize>,
    /// Qualitative label derived from the score.
    pub label: DifficultyLabel,
    /// Unclamped terms of the score.
    pub components: ScoreComponents,
    /// Number of steps in the trace.
    pub total_steps: usize,
    /// Number of distinct techniques used.
    pub variety: usize,
    /// Share of steps made with advanced techniques.
    pub advanced_ratio: f64,
}

impl Difficulty {
    /// Returns how many steps `kind` produced.
    #[must_use]
    pub fn usage_of(&self, kind: TechniqueKind) -> usize {
        self.usage.get(&kind).copied().unwrap_or(0)
    }

    /// Describes the solve in a short human-readable sentence.
    ///
    /// # Examples
    ///
    /// ```
    /// use binairo_rank::DifficultyRanker;
    /// use binairo_solver::technique::TechniqueKind;
    ///
    /// let difficulty = DifficultyRanker::new().rank_techniques([TechniqueKind::AvoidThree; 4], 6);
    /// assert_eq!(difficulty.analysis(), "Quick solve");
    /// ```
    #[must_use]
    pub fn analysis(&self) -> String {
        let mut parts = vec![match self.total_steps {
            0..=10 => "Quick solve",
            11..=20 => "Moderate solving time",
            _ => "Long solve required",
        }];

        let repeated = |kind| self.usage_of(kind) > 1;
        if repeated(TechniqueKind::DuplicatePrevention) {
            parts.push("requires duplicate prevention");
        }
        if repeated(TechniqueKind::ForcedMove) {
            parts.push("needs constraint propagation");
        }
        if self.usage.values().filter(|&&count| count > 1).count() >= 3 {
            parts.push("uses multiple techniques");
        }

        if self.advanced_ratio > 0.5 {
            parts.push("heavily relies on advanced techniques");
        } else if self.advanced_ratio > 0.2 {
            parts.push("needs some advanced techniques");
        }

        parts.join("; ")
    }
}
