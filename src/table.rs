//! Derived output table
//!
//! Column-oriented container for one configuration's results: the task
//! description columns carried over from the input, followed by every
//! derived measure in a fixed order. Serializes to JSON with non-finite
//! values rendered as null.

use serde::Serialize;

use crate::error::ComputeError;
use crate::types::{Dimension, TrialTable};

/// Task description columns, one entry per trial in task order
#[derive(Debug, Clone, Serialize)]
pub struct TaskColumns {
    pub decision_num: Vec<u32>,
    pub dimension: Vec<Dimension>,
    pub scene_num: Vec<u32>,
    pub char_role_num: Vec<u32>,
    pub char_decision_num: Vec<u32>,
    pub reaction_time: Vec<f64>,
}

impl TaskColumns {
    pub(crate) fn from_table(table: &TrialTable) -> Self {
        let records = table.records();
        Self {
            decision_num: records.iter().map(|r| r.decision_num).collect(),
            dimension: records.iter().map(|r| r.dimension).collect(),
            scene_num: records.iter().map(|r| r.scene_num).collect(),
            char_role_num: records.iter().map(|r| r.char_role_num).collect(),
            char_decision_num: records.iter().map(|r| r.char_decision_num).collect(),
            reaction_time: records.iter().map(|r| r.reaction_time).collect(),
        }
    }
}

/// One derived measure across all trials
#[derive(Debug, Clone, Serialize)]
pub struct DerivedColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Full result table for one configuration
#[derive(Debug, Clone, Serialize)]
pub struct DerivedTable {
    pub task: TaskColumns,
    columns: Vec<DerivedColumn>,
}

impl DerivedTable {
    pub(crate) fn new(task: TaskColumns) -> Self {
        Self {
            task,
            columns: Vec::new(),
        }
    }

    pub(crate) fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.n_trials());
        self.columns.push(DerivedColumn {
            name: name.into(),
            values,
        });
    }

    /// Number of trials covered by every column
    pub fn n_trials(&self) -> usize {
        self.task.decision_num.len()
    }

    /// All derived columns, in output order
    pub fn columns(&self) -> &[DerivedColumn] {
        &self.columns
    }

    /// Values of a derived column, if present
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Names of all derived columns, in output order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Serialize the table to a JSON string
    pub fn to_json(&self) -> Result<String, ComputeError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_task() -> TaskColumns {
        TaskColumns {
            decision_num: vec![1, 2],
            dimension: vec![Dimension::Affil, Dimension::Power],
            scene_num: vec![1, 1],
            char_role_num: vec![1, 2],
            char_decision_num: vec![1, 1],
            reaction_time: vec![0.5, 0.8],
        }
    }

    #[test]
    fn test_push_and_lookup() {
        let mut table = DerivedTable::new(empty_task());
        table.push_column("affil_coord", vec![1.0, 2.0]);
        assert_eq!(table.n_trials(), 2);
        assert_eq!(table.column("affil_coord"), Some(&[1.0, 2.0][..]));
        assert_eq!(table.column("power_coord"), None);
        assert_eq!(table.column_names(), vec!["affil_coord"]);
    }

    #[test]
    fn test_json_renders_nan_as_null() {
        let mut table = DerivedTable::new(empty_task());
        table.push_column("consistency", vec![f64::NAN, 0.5]);
        let json = table.to_json().unwrap();
        assert!(json.contains("\"consistency\""));
        assert!(json.contains("[null,0.5]"));
    }

    #[test]
    fn test_task_columns_serialize_dimension_names() {
        let table = DerivedTable::new(empty_task());
        let json = table.to_json().unwrap();
        assert!(json.contains("\"affil\""));
        assert!(json.contains("\"power\""));
    }
}
