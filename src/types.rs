//! Core types for the behavioral-geometry pipeline
//!
//! This module defines the validated trial table the engine consumes and the
//! configuration values that select how trajectories are computed.

use crate::error::ComputeError;
use serde::{Deserialize, Serialize};

/// Number of decision trials in one subject's task run
pub const DECISION_TRIALS: usize = 63;

/// Number of decisions made about any single character
pub const CHARACTER_DECISIONS: u32 = 12;

/// Half-width of the task's affiliation/power space; also the fixed
/// maximum-scale endpoint used by the polar reference frames
pub const SPACE_BOUND: f64 = 6.0;

/// Dimension probed on a decision trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Affil,
    Power,
    Neutral,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Affil => "affil",
            Dimension::Power => "power",
            Dimension::Neutral => "neutral",
        }
    }
}

/// Button pressed on a decision trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPress {
    /// No response recorded
    None,
    /// First response option
    Option1,
    /// Second response option
    Option2,
}

/// A single decision trial from the social navigation task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Position in the 63-trial sequence (1-based, unique)
    pub decision_num: u32,
    /// Dimension probed on this trial
    pub dimension: Dimension,
    /// Narrative scene the trial belongs to
    pub scene_num: u32,
    /// Character role involved in the trial (9 marks the neutral character)
    pub char_role_num: u32,
    /// How many decisions about this character so far (1-12)
    pub char_decision_num: u32,
    /// Button pressed by the subject
    pub button_press: ButtonPress,
    /// Signed decision value (-1, 0, or +1)
    pub decision: i32,
    /// Affiliation component of the decision
    pub affil: i32,
    /// Power component of the decision
    pub power: i32,
    /// Response latency (seconds)
    pub reaction_time: f64,
}

/// Validated trial table in canonical `decision_num` order.
///
/// Construction checks the full input contract; a `TrialTable` in hand is
/// guaranteed to hold exactly [`DECISION_TRIALS`] well-formed records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialTable {
    records: Vec<TrialRecord>,
}

impl TrialTable {
    /// Validate records and sort them into canonical trial order
    pub fn new(mut records: Vec<TrialRecord>) -> Result<Self, ComputeError> {
        if records.len() != DECISION_TRIALS {
            return Err(ComputeError::InvalidTrialTable(format!(
                "expected {} trials, got {}",
                DECISION_TRIALS,
                records.len()
            )));
        }

        records.sort_by_key(|r| r.decision_num);
        for (i, record) in records.iter().enumerate() {
            let expected = (i + 1) as u32;
            if record.decision_num != expected {
                return Err(ComputeError::InvalidTrialTable(format!(
                    "decision_num values must form the contiguous sequence 1..={}; \
                     found {} where {} was expected",
                    DECISION_TRIALS, record.decision_num, expected
                )));
            }
            Self::check_record(record)?;
        }

        Ok(Self { records })
    }

    /// Parse a table from a JSON array of trial records
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let records: Vec<TrialRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    fn check_record(record: &TrialRecord) -> Result<(), ComputeError> {
        let fail = |msg: String| Err(ComputeError::InvalidTrialTable(msg));

        if !(-1..=1).contains(&record.affil) || !(-1..=1).contains(&record.power) {
            return fail(format!(
                "trial {}: affil/power must be in {{-1, 0, 1}}",
                record.decision_num
            ));
        }
        if record.decision != record.affil + record.power {
            return fail(format!(
                "trial {}: decision {} != affil {} + power {}",
                record.decision_num, record.decision, record.affil, record.power
            ));
        }
        match record.dimension {
            Dimension::Affil if record.power != 0 => {
                return fail(format!(
                    "trial {}: affil trial carries a power value",
                    record.decision_num
                ));
            }
            Dimension::Power if record.affil != 0 => {
                return fail(format!(
                    "trial {}: power trial carries an affil value",
                    record.decision_num
                ));
            }
            Dimension::Neutral if record.affil != 0 || record.power != 0 => {
                return fail(format!(
                    "trial {}: neutral trial carries a decision value",
                    record.decision_num
                ));
            }
            _ => {}
        }
        if record.char_decision_num < 1 || record.char_decision_num > CHARACTER_DECISIONS {
            return fail(format!(
                "trial {}: char_decision_num {} outside 1..={}",
                record.decision_num, record.char_decision_num, CHARACTER_DECISIONS
            ));
        }
        if !record.reaction_time.is_finite() || record.reaction_time < 0.0 {
            return fail(format!(
                "trial {}: reaction_time must be a non-negative finite number",
                record.decision_num
            ));
        }
        Ok(())
    }

    /// Records in canonical trial order
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How the decision entering each trial's update is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// The trial's own choice
    Current,
    /// The preceding trial's choice, shifted forward by one
    Previous,
}

impl DecisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionPolicy::Current => "current",
            DecisionPolicy::Previous => "previous",
        }
    }
}

/// How decisions are weighted over a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Every trial weighs 1
    Constant,
    /// Weights fall linearly from 1 to 1/N
    LinearDecay,
    /// Weights fall geometrically from 1 to 1/N
    ExponentialDecay,
}

impl WeightPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPolicy::Constant => "constant",
            WeightPolicy::LinearDecay => "linear_decay",
            WeightPolicy::ExponentialDecay => "exponential_decay",
        }
    }
}

/// Which coordinate sequence the trajectory builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordPolicy {
    /// The path actually taken
    Actual,
    /// The path had each single choice been reversed, others held fixed
    Counterfactual,
}

impl CoordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordPolicy::Actual => "actual",
            CoordPolicy::Counterfactual => "counterfactual",
        }
    }
}

/// One fully specified way of computing trajectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub decision: DecisionPolicy,
    pub weight: WeightPolicy,
    pub coord: CoordPolicy,
    /// Mean-center the built coordinates per dimension
    pub demean_coords: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            decision: DecisionPolicy::Current,
            weight: WeightPolicy::Constant,
            coord: CoordPolicy::Actual,
            demean_coords: false,
        }
    }
}

impl Configuration {
    /// Key identifying this configuration in grid output
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.decision.as_str(),
            self.weight.as_str(),
            self.coord.as_str()
        )
    }
}

/// Cross product of configuration axes computed in one pass.
///
/// Axis order is fixed: decision policy varies slowest, coordinate policy
/// fastest. The mean-centering flag is shared by every combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigGrid {
    pub decisions: Vec<DecisionPolicy>,
    pub weights: Vec<WeightPolicy>,
    pub coords: Vec<CoordPolicy>,
    pub demean_coords: bool,
}

impl Default for ConfigGrid {
    fn default() -> Self {
        Self {
            decisions: vec![DecisionPolicy::Current],
            weights: vec![WeightPolicy::Constant],
            coords: vec![CoordPolicy::Actual],
            demean_coords: false,
        }
    }
}

impl ConfigGrid {
    /// Grid covering every combination of the three axes
    pub fn full() -> Self {
        Self {
            decisions: vec![DecisionPolicy::Current, DecisionPolicy::Previous],
            weights: vec![
                WeightPolicy::Constant,
                WeightPolicy::LinearDecay,
                WeightPolicy::ExponentialDecay,
            ],
            coords: vec![CoordPolicy::Actual, CoordPolicy::Counterfactual],
            demean_coords: false,
        }
    }

    /// Enumerate the configurations in axis-major order
    pub fn combinations(&self) -> Result<Vec<Configuration>, ComputeError> {
        if self.decisions.is_empty() || self.weights.is_empty() || self.coords.is_empty() {
            return Err(ComputeError::InvalidConfiguration(
                "every configuration axis needs at least one policy".to_string(),
            ));
        }
        let mut combos =
            Vec::with_capacity(self.decisions.len() * self.weights.len() * self.coords.len());
        for &decision in &self.decisions {
            for &weight in &self.weights {
                for &coord in &self.coords {
                    combos.push(Configuration {
                        decision,
                        weight,
                        coord,
                        demean_coords: self.demean_coords,
                    });
                }
            }
        }
        Ok(combos)
    }
}

/// How trials are split into independently computed trajectories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One trajectory per character role
    CharacterRole,
    /// All trials form a single trajectory
    None,
    /// Caller-supplied label per trial
    Labels(Vec<u32>),
}

impl GroupBy {
    /// Resolve the per-trial grouping labels for `table`
    pub(crate) fn labels_for(&self, table: &TrialTable) -> Result<Vec<u32>, ComputeError> {
        match self {
            GroupBy::CharacterRole => {
                Ok(table.records().iter().map(|r| r.char_role_num).collect())
            }
            GroupBy::None => Ok(vec![1; table.len()]),
            GroupBy::Labels(labels) => {
                if labels.len() != table.len() {
                    return Err(ComputeError::LabelMismatch(format!(
                        "{} labels for {} trials",
                        labels.len(),
                        table.len()
                    )));
                }
                Ok(labels.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_records() -> Vec<TrialRecord> {
        (1u32..=63)
            .map(|n| {
                let dimension = match n % 3 {
                    0 => Dimension::Neutral,
                    1 => Dimension::Affil,
                    _ => Dimension::Power,
                };
                let (affil, power) = match dimension {
                    Dimension::Affil => (if n % 2 == 0 { 1 } else { -1 }, 0),
                    Dimension::Power => (0, if n % 2 == 0 { 1 } else { -1 }),
                    Dimension::Neutral => (0, 0),
                };
                TrialRecord {
                    decision_num: n,
                    dimension,
                    scene_num: (n - 1) / 9 + 1,
                    char_role_num: (n - 1) % 6 + 1,
                    char_decision_num: (n - 1) % 12 + 1,
                    button_press: ButtonPress::Option1,
                    decision: affil + power,
                    affil,
                    power,
                    reaction_time: 1.5,
                }
            })
            .collect()
    }

    #[test]
    fn test_valid_table() {
        let table = TrialTable::new(make_records()).unwrap();
        assert_eq!(table.len(), DECISION_TRIALS);
        assert_eq!(table.records()[0].decision_num, 1);
        assert_eq!(table.records()[62].decision_num, 63);
    }

    #[test]
    fn test_out_of_order_records_are_sorted() {
        let mut records = make_records();
        records.reverse();
        let table = TrialTable::new(records).unwrap();
        let nums: Vec<u32> = table.records().iter().map(|r| r.decision_num).collect();
        assert_eq!(nums, (1..=63).collect::<Vec<u32>>());
    }

    #[test]
    fn test_wrong_trial_count_fails() {
        let mut records = make_records();
        records.pop();
        let err = TrialTable::new(records).unwrap_err();
        assert!(err.to_string().contains("expected 63 trials"));
    }

    #[test]
    fn test_duplicate_decision_num_fails() {
        let mut records = make_records();
        records[5].decision_num = 3;
        assert!(TrialTable::new(records).is_err());
    }

    #[test]
    fn test_cross_dimension_value_fails() {
        let mut records = make_records();
        records[0].power = 1; // trial 1 is an affil trial
        records[0].decision = records[0].affil + 1;
        assert!(TrialTable::new(records).is_err());
    }

    #[test]
    fn test_neutral_with_decision_fails() {
        let mut records = make_records();
        records[2].affil = 1; // trial 3 is neutral
        records[2].decision = 1;
        assert!(TrialTable::new(records).is_err());
    }

    #[test]
    fn test_decision_sum_invariant() {
        let mut records = make_records();
        records[0].decision = 0; // affil is -1 on trial 1
        assert!(TrialTable::new(records).is_err());
    }

    #[test]
    fn test_missed_trial_is_valid() {
        let mut records = make_records();
        records[0].affil = 0;
        records[0].decision = 0;
        records[0].button_press = ButtonPress::None;
        assert!(TrialTable::new(records).is_ok());
    }

    #[test]
    fn test_negative_reaction_time_fails() {
        let mut records = make_records();
        records[10].reaction_time = -0.2;
        assert!(TrialTable::new(records).is_err());
    }

    #[test]
    fn test_from_json_round_trip() {
        let table = TrialTable::new(make_records()).unwrap();
        let json = serde_json::to_string(table.records()).unwrap();
        let parsed = TrialTable::from_json(&json).unwrap();
        assert_eq!(parsed.len(), DECISION_TRIALS);
        assert_eq!(parsed.records()[7].char_role_num, table.records()[7].char_role_num);
    }

    #[test]
    fn test_configuration_key() {
        let config = Configuration {
            decision: DecisionPolicy::Previous,
            weight: WeightPolicy::LinearDecay,
            coord: CoordPolicy::Counterfactual,
            demean_coords: false,
        };
        assert_eq!(config.key(), "previous_linear_decay_counterfactual");
        assert_eq!(Configuration::default().key(), "current_constant_actual");
    }

    #[test]
    fn test_grid_combinations_order() {
        let combos = ConfigGrid::full().combinations().unwrap();
        assert_eq!(combos.len(), 12);
        assert_eq!(combos[0].key(), "current_constant_actual");
        assert_eq!(combos[1].key(), "current_constant_counterfactual");
        assert_eq!(combos[2].key(), "current_linear_decay_actual");
        assert_eq!(combos[11].key(), "previous_exponential_decay_counterfactual");
    }

    #[test]
    fn test_empty_axis_fails() {
        let grid = ConfigGrid {
            weights: Vec::new(),
            ..ConfigGrid::default()
        };
        assert!(grid.combinations().is_err());
    }

    #[test]
    fn test_group_labels() {
        let table = TrialTable::new(make_records()).unwrap();

        let roles = GroupBy::CharacterRole.labels_for(&table).unwrap();
        assert_eq!(roles.len(), 63);
        assert_eq!(roles[0], 1);
        assert_eq!(roles[6], 1);

        let single = GroupBy::None.labels_for(&table).unwrap();
        assert!(single.iter().all(|&l| l == 1));

        let custom = GroupBy::Labels(vec![2; 63]).labels_for(&table).unwrap();
        assert_eq!(custom, vec![2; 63]);

        assert!(GroupBy::Labels(vec![1, 2, 3]).labels_for(&table).is_err());
    }
}
