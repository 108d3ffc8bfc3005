//! Rule partitioning: selecting the entries of a declaration keyed under one side.

use crate::errors::{MigrationError, MigrationResult};
use crate::migration::declaration::{Declaration, Rule};
use crate::migration::label::Side;

/// A declaration entry of one side, reduced to its field name and rule.
#[derive(Debug, Clone)]
pub struct PartitionedRule<'a> {
    pub field: &'a str,
    pub rule: &'a Rule,
}

/// The entries of a declaration split by the side of their keys, each side in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub left: Vec<PartitionedRule<'a>>,
    pub right: Vec<PartitionedRule<'a>>,
}

impl<'a> Partition<'a> {
    pub fn side(&self, side: Side) -> &[PartitionedRule<'a>] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Split `declaration` by key side in one pass.
///
/// Entries written into a split group must carry keys of that group's side.
pub fn partition(declaration: &Declaration) -> MigrationResult<Partition<'_>> {
    let mut partition = Partition::default();
    for entry in declaration.entries() {
        if let Some(group) = entry.group {
            if group != entry.key.side {
                return Err(MigrationError::WrongSide {
                    group,
                    key: entry.key.clone(),
                });
            }
        }
        let rule = PartitionedRule {
            field: entry.key.name.as_str(),
            rule: &entry.rule,
        };
        match entry.key.side {
            Side::Left => partition.left.push(rule),
            Side::Right => partition.right.push(rule),
        }
    }
    Ok(partition)
}
