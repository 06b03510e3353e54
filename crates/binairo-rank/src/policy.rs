use binairo_solver::technique::TechniqueKind;
use serde::Deserialize;

/// Cognitive weight of each technique.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TechniqueWeights {
    /// Weight of Avoid-Three.
    pub avoid_three: f64,
    /// Weight of Balance.
    pub balance: f64,
    /// Weight of Duplicate-Prevention.
    pub duplicate_prevention: f64,
    /// Weight of Forced-Move.
    pub forced_move: f64,
}

impl Default for TechniqueWeights {
    fn default() -> Self {
        Self {
            avoid_three: 1.0,
            balance: 2.0,
            duplicate_prevention: 4.0,
            forced_move: 3.0,
        }
    }
}

impl TechniqueWeights {
    /// Returns the weight of `kind`.
    #[must_use]
    pub fn weight(&self, kind: TechniqueKind) -> f64 {
        match kind {
            TechniqueKind::AvoidThree => self.avoid_three,
            TechniqueKind::Balance => self.balance,
            TechniqueKind::DuplicatePrevention => self.duplicate_prevention,
            TechniqueKind::ForcedMove => self.forced_move,
        }
    }
}

/// Tunable constants of the difficulty score.
///
/// Every field has a default, so a JSON policy only needs to name the fields
/// it overrides:
///
/// ```
/// use binairo_rank::RankPolicy;
///
/// let policy: RankPolicy =
///     serde_json::from_str(r#"{ "variety_step": 1.0, "weights": { "balance": 1.5 } }"#)?;
/// assert_eq!(policy.variety_step, 1.0);
/// assert_eq!(policy.weights.balance, 1.5);
/// assert_eq!(policy.weights.avoid_three, 1.0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankPolicy {
    /// Technique weights.
    pub weights: TechniqueWeights,
    /// Multiplier applied to the average weight.
    pub base_scale: f64,
    /// Grid size at which the base term is not compressed.
    pub reference_size: usize,
    /// Minimum weight of a technique counted as advanced.
    pub hard_weight: f64,
    /// Bonus per switch between two different advanced techniques.
    pub interaction_step: f64,
    /// Upper bound of the interaction bonus.
    pub interaction_cap: f64,
    /// Bonus per distinct technique beyond the first.
    pub variety_step: f64,
    /// Bonus for a trace made only of advanced steps.
    pub advanced_scale: f64,
    /// Bonus for a trace with as many steps as the grid has cells.
    pub length_scale: f64,
    /// Upper bound of the length bonus.
    pub length_cap: f64,
    /// Highest score labelled easy.
    pub easy_max: f64,
    /// Highest score labelled moderate.
    pub moderate_max: f64,
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self {
            weights: TechniqueWeights::default(),
            base_scale: 2.5,
            reference_size: 6,
            hard_weight: 3.0,
            interaction_step: 0.5,
            interaction_cap: 1.5,
            variety_step: 0.8,
            advanced_scale: 3.0,
            length_scale: 1.5,
            length_cap: 1.5,
            easy_max: 3.0,
            moderate_max: 6.0,
        }
    }
}

impl RankPolicy {
    /// Returns `true` if `kind` counts as an advanced technique.
    #[must_use]
    pub fn is_advanced(&self, kind: TechniqueKind) -> bool {
        self.weights.weight(kind) >= self.hard_weight
    }
}
