//! Pipeline orchestration
//!
//! This module provides the public API for the behavior-geometry engine.
//! It orchestrates the full pipeline from a validated trial table to the
//! derived output table: trajectories per grouping, polar descriptors,
//! consistency scores, whole-task running means, and shape metrics over
//! the merged coordinate cloud.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::consistency::consistency_columns;
use crate::error::ComputeError;
use crate::polar::polar_descriptors;
use crate::shape::shape_columns;
use crate::stats::{running_circular_mean, running_mean};
use crate::table::{DerivedTable, TaskColumns};
use crate::trajectory::build_trajectory;
use crate::types::{ConfigGrid, Configuration, GroupBy, TrialTable};

/// Derived columns exempt from whole-task running means, along with any
/// column that already is a mean
const OVERALL_MEAN_EXEMPT: [&str; 3] = ["responded", "affil_decision", "power_decision"];

/// Result of a pipeline run: one table for a single configuration, or
/// one table per configuration key when the grid has several.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComputeOutput {
    Single(DerivedTable),
    Grid(BTreeMap<String, DerivedTable>),
}

impl ComputeOutput {
    /// The table of a single-configuration run, if this is one
    pub fn single(&self) -> Option<&DerivedTable> {
        match self {
            ComputeOutput::Single(table) => Some(table),
            ComputeOutput::Grid(_) => None,
        }
    }

    /// Look up a grid table by its configuration key
    pub fn get(&self, key: &str) -> Option<&DerivedTable> {
        match self {
            ComputeOutput::Single(_) => None,
            ComputeOutput::Grid(tables) => tables.get(key),
        }
    }
}

/// Compute the derived table for one configuration.
///
/// # Arguments
/// * `table` - validated trial table
/// * `config` - decision, weight, and coordinate policies to apply
/// * `group_by` - how trials split into independent trajectories
///
/// # Returns
/// A `DerivedTable` with one row per trial in task order
pub fn compute_behavior(
    table: &TrialTable,
    config: &Configuration,
    group_by: &GroupBy,
) -> Result<DerivedTable, ComputeError> {
    let labels = group_by.labels_for(table)?;
    Ok(compute_one(table, config, &labels))
}

/// Compute derived tables for every configuration in a grid.
///
/// # Arguments
/// * `table` - validated trial table
/// * `grid` - configuration axes to cross
/// * `group_by` - how trials split into independent trajectories
///
/// # Returns
/// `ComputeOutput::Single` when the grid holds exactly one combination,
/// otherwise `ComputeOutput::Grid` keyed by configuration
pub fn compute_behavior_grid(
    table: &TrialTable,
    grid: &ConfigGrid,
    group_by: &GroupBy,
) -> Result<ComputeOutput, ComputeError> {
    let combos = grid.combinations()?;
    let labels = group_by.labels_for(table)?;

    if combos.len() == 1 {
        return Ok(ComputeOutput::Single(compute_one(table, &combos[0], &labels)));
    }
    let mut tables = BTreeMap::new();
    for config in &combos {
        tables.insert(config.key(), compute_one(table, config, &labels));
    }
    Ok(ComputeOutput::Grid(tables))
}

/// Scatter per-grouping columns back into task order. The global buffers
/// are created NaN-filled on first use; grouping members overwrite their
/// own rows only.
fn scatter_columns(
    global: &mut Vec<(String, Vec<f64>)>,
    local: &[(String, Vec<f64>)],
    indices: &[usize],
    n_trials: usize,
) {
    if global.is_empty() {
        for (name, _) in local {
            global.push((name.clone(), vec![f64::NAN; n_trials]));
        }
    }
    for ((_, buffer), (_, values)) in global.iter_mut().zip(local) {
        for (local_row, &global_row) in indices.iter().enumerate() {
            buffer[global_row] = values[local_row];
        }
    }
}

fn compute_one(table: &TrialTable, config: &Configuration, labels: &[u32]) -> DerivedTable {
    let records = table.records();
    let n = records.len();

    let raw_affil: Vec<f64> = records.iter().map(|r| r.affil as f64).collect();
    let raw_power: Vec<f64> = records.iter().map(|r| r.power as f64).collect();

    let mut label_list: Vec<u32> = labels.to_vec();
    label_list.sort_unstable();
    label_list.dedup();

    // Stage 1: per-grouping trajectories, scattered back into task order
    let mut responded = vec![f64::NAN; n];
    let mut affil_decision = vec![f64::NAN; n];
    let mut power_decision = vec![f64::NAN; n];
    let mut affil_coord = vec![f64::NAN; n];
    let mut power_coord = vec![f64::NAN; n];
    let mut affil_mean = vec![f64::NAN; n];
    let mut power_mean = vec![f64::NAN; n];
    let mut affil_centroid = vec![f64::NAN; n];
    let mut power_centroid = vec![f64::NAN; n];
    let mut polar_global: Vec<(String, Vec<f64>)> = Vec::new();
    let mut consistency_global: Vec<(String, Vec<f64>)> = Vec::new();

    for label in label_list {
        let indices: Vec<usize> = (0..n).filter(|&i| labels[i] == label).collect();
        let member_affil: Vec<f64> = indices.iter().map(|&i| raw_affil[i]).collect();
        let member_power: Vec<f64> = indices.iter().map(|&i| raw_power[i]).collect();

        let trajectory = build_trajectory(&indices, &member_affil, &member_power, config);
        for point in &trajectory {
            let row = point.trial_index;
            responded[row] = if point.responded { 1.0 } else { 0.0 };
            affil_decision[row] = point.affil_decision;
            power_decision[row] = point.power_decision;
            affil_coord[row] = point.affil_coord;
            power_coord[row] = point.power_coord;
            affil_mean[row] = point.affil_mean;
            power_mean[row] = point.power_mean;
            affil_centroid[row] = point.affil_centroid;
            power_centroid[row] = point.power_centroid;
        }

        // Stage 2: polar descriptors over the grouping's coordinates
        let coords_a: Vec<f64> = trajectory.iter().map(|p| p.affil_coord).collect();
        let coords_p: Vec<f64> = trajectory.iter().map(|p| p.power_coord).collect();
        let polar = polar_descriptors(&coords_a, &coords_p);
        scatter_columns(&mut polar_global, &polar, &indices, n);

        // Stage 3: consistency against the simulated envelope
        let weighted_a: Vec<f64> = trajectory.iter().map(|p| p.affil_decision).collect();
        let weighted_p: Vec<f64> = trajectory.iter().map(|p| p.power_decision).collect();
        let consistency = consistency_columns(&weighted_a, &weighted_p);
        scatter_columns(&mut consistency_global, &consistency, &indices, n);
    }

    let mut output = DerivedTable::new(TaskColumns::from_table(table));
    output.push_column("responded", responded);
    output.push_column("affil_decision", affil_decision);
    output.push_column("power_decision", power_decision);
    output.push_column("affil_coord", affil_coord.clone());
    output.push_column("power_coord", power_coord.clone());
    output.push_column("affil_mean", affil_mean);
    output.push_column("power_mean", power_mean);
    output.push_column("affil_centroid", affil_centroid);
    output.push_column("power_centroid", power_centroid);
    for (name, values) in polar_global {
        output.push_column(name, values);
    }
    for (name, values) in consistency_global {
        output.push_column(name, values);
    }

    // Stage 4: running means across the whole task, every grouping merged
    let overall: Vec<(String, Vec<f64>)> = output
        .columns()
        .iter()
        .filter(|c| {
            !OVERALL_MEAN_EXEMPT.contains(&c.name.as_str()) && !c.name.contains("mean")
        })
        .map(|c| {
            let mean = if c.name.contains("angle") {
                running_circular_mean(&c.values, &vec![true; n])
            } else {
                running_mean(&c.values)
            };
            (format!("{}_overallmean", c.name), mean)
        })
        .collect();
    for (name, values) in overall {
        output.push_column(name, values);
    }

    // Stage 5: shape of the merged coordinate cloud
    let char_decisions: Vec<f64> = records.iter().map(|r| r.char_decision_num as f64).collect();
    for (name, values) in shape_columns(&affil_coord, &power_coord, &char_decisions) {
        output.push_column(name, values);
    }

    output
}

/// Stateful processor holding a configuration grid and grouping choice.
///
/// Use this when the same analysis settings apply to many subjects.
pub struct GeometryProcessor {
    grid: ConfigGrid,
    group_by: GroupBy,
}

impl Default for GeometryProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor {
    /// Create a processor with the default single configuration,
    /// grouping trials by character role
    pub fn new() -> Self {
        Self {
            grid: ConfigGrid::default(),
            group_by: GroupBy::CharacterRole,
        }
    }

    /// Replace the configuration grid
    pub fn with_grid(mut self, grid: ConfigGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Replace the trial grouping
    pub fn with_grouping(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    /// Run the pipeline on a validated trial table
    pub fn process(&self, table: &TrialTable) -> Result<ComputeOutput, ComputeError> {
        compute_behavior_grid(table, &self.grid, &self.group_by)
    }

    /// Run the pipeline on a JSON array of trial records, returning the
    /// output as JSON
    pub fn process_json(&self, json: &str) -> Result<String, ComputeError> {
        let table = TrialTable::from_json(json)?;
        let output = self.process(&table)?;
        Ok(serde_json::to_string(&output)?)
    }
}
