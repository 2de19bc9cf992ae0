//! Classifies imported cost-code rows into hierarchy levels.
//!
//! Rows are imported level by level (roots first) so that every parent is
//! persisted before its children look it up. A row's level is the length of
//! its parent chain: in-batch ancestors are followed row by row, and a chain
//! that leaves the batch continues at the persisted record's own level.
//! Rows whose chain cannot be resolved are rejected here rather than left to
//! fail during insertion.

use std::collections::{HashMap, HashSet};

use crate::constants::MAX_COST_CODE_LEVELS;

use super::{CostCodeConfiguration, CostCodeImportRow};

/// A row together with its position in the submitted batch
#[derive(Debug, Clone, Copy)]
pub struct IndexedRow<'a> {
    pub index: usize,
    pub row: &'a CostCodeImportRow,
}

/// Why a row could not be placed in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionRejection {
    SelfParent,
    MissingParent(String),
    UnresolvedAncestor(String),
    Cycle,
    TooDeep,
}

impl std::fmt::Display for PartitionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionRejection::SelfParent => write!(f, "Cost code cannot be its own parent"),
            PartitionRejection::MissingParent(parent) => {
                write!(f, "Parent cost code '{}' not found", parent)
            }
            PartitionRejection::UnresolvedAncestor(parent) => write!(
                f,
                "Parent cost code '{}' cannot be placed in the hierarchy",
                parent
            ),
            PartitionRejection::Cycle => write!(f, "Parent chain forms a cycle"),
            PartitionRejection::TooDeep => write!(
                f,
                "Exceeds the maximum nesting depth of {} levels",
                MAX_COST_CODE_LEVELS
            ),
        }
    }
}

/// Output of [`partition_by_level`]. Each bucket keeps the original relative
/// order of its rows.
#[derive(Debug, Default)]
pub struct PartitionedCostCodes<'a> {
    pub levels: [Vec<IndexedRow<'a>>; MAX_COST_CODE_LEVELS],
    pub rejected: Vec<(IndexedRow<'a>, PartitionRejection)>,
}

/// Computes the level (0-based) of every persisted cost code, keyed by
/// cost code number.
pub fn stored_levels(configurations: &[CostCodeConfiguration]) -> HashMap<String, usize> {
    let by_id: HashMap<&str, &CostCodeConfiguration> = configurations
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect();

    configurations
        .iter()
        .map(|config| {
            let mut level = 0;
            let mut current = config;
            while let Some(parent) = current
                .parent_cost_code_id
                .as_deref()
                .and_then(|id| by_id.get(id))
            {
                level += 1;
                current = parent;
                // Stored data is acyclic; the guard only bounds the walk.
                if level > configurations.len() {
                    break;
                }
            }
            (config.cost_code_number.clone(), level)
        })
        .collect()
}

/// Splits `rows` into level buckets.
///
/// `persisted` maps the cost code numbers already stored for the corporation
/// to their level, so a row may hang under an existing record.
pub fn partition_by_level<'a>(
    rows: &'a [CostCodeImportRow],
    persisted: &HashMap<String, usize>,
) -> PartitionedCostCodes<'a> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (index, row) in rows.iter().enumerate() {
        if let Some(number) = row.number() {
            positions.entry(number).or_insert(index);
        }
    }

    let mut result = PartitionedCostCodes::default();
    for (index, row) in rows.iter().enumerate() {
        let entry = IndexedRow { index, row };
        match level_of(rows, index, &positions, persisted) {
            Ok(level) if level < MAX_COST_CODE_LEVELS => result.levels[level].push(entry),
            Ok(_) => result.rejected.push((entry, PartitionRejection::TooDeep)),
            Err(rejection) => result.rejected.push((entry, rejection)),
        }
    }
    result
}

fn level_of(
    rows: &[CostCodeImportRow],
    index: usize,
    positions: &HashMap<&str, usize>,
    persisted: &HashMap<String, usize>,
) -> Result<usize, PartitionRejection> {
    let row = &rows[index];
    // Rows without a number fail validation at import time; keep them in the
    // first bucket so that error is the one reported.
    let (Some(number), Some(first_parent)) = (row.number(), row.parent_number()) else {
        return Ok(0);
    };
    if first_parent == number {
        return Err(PartitionRejection::SelfParent);
    }

    let mut visited: HashSet<usize> = HashSet::from([index]);
    let mut parent = first_parent;
    let mut depth = 0;
    loop {
        depth += 1;
        // A stored parent keeps its stored place even when the batch repeats
        // it with a different parent; the repeated row is a duplicate.
        if let Some(stored_level) = persisted.get(parent) {
            return Ok(depth + stored_level);
        }
        match positions.get(parent) {
            Some(&position) => {
                if !visited.insert(position) {
                    return Err(PartitionRejection::Cycle);
                }
                let ancestor = &rows[position];
                match ancestor.parent_number() {
                    None => return Ok(depth),
                    Some(next) if Some(next) == ancestor.number() => {
                        return Err(PartitionRejection::UnresolvedAncestor(
                            first_parent.to_string(),
                        ));
                    }
                    Some(next) => parent = next,
                }
            }
            None if depth == 1 => {
                return Err(PartitionRejection::MissingParent(first_parent.to_string()))
            }
            None => {
                return Err(PartitionRejection::UnresolvedAncestor(
                    first_parent.to_string(),
                ))
            }
        }
    }
}
