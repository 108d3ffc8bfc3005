//! The compiled artifact: one converter per field per side.

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::MissingFieldPolicy;
use crate::errors::{MigrationError, MigrationResult};
use crate::migration::declaration::ComputeFn;
use crate::migration::label::{FieldRef, Labels, Side};
use crate::record::Record;

/// Produces the value of one field from the whole opposite-side record.
#[derive(Debug, Clone)]
pub(crate) enum Converter {
    /// Copy the named field of the opposite record.
    Copy { source: String },
    Compute(ComputeFn),
}

/// Converters for the fields of one side, keyed by field name.
#[derive(Debug, Clone)]
pub(crate) struct ConverterTable {
    side: Side,
    fields: Vec<String>,
    converters: HashMap<String, Converter>,
}

impl ConverterTable {
    pub(crate) fn new(labels: &Labels) -> Self {
        Self {
            side: labels.side(),
            fields: labels.names().map(str::to_string).collect(),
            converters: HashMap::with_capacity(labels.len()),
        }
    }

    /// Install the converter for `field`, returning the one it replaces.
    pub(crate) fn install(&mut self, field: &str, converter: Converter) -> Option<Converter> {
        self.converters.insert(field.to_string(), converter)
    }

    /// Build a record of this side from a record of the opposite side.
    fn convert(&self, input: &Record, policy: MissingFieldPolicy) -> MigrationResult<Record> {
        let mut output = Record::new();
        for field in &self.fields {
            let Some(converter) = self.converters.get(field) else {
                continue;
            };
            match converter {
                Converter::Copy { source } => match input.get(source) {
                    Some(value) => {
                        output.insert(field.as_str(), value.clone());
                    }
                    None if policy == MissingFieldPolicy::Skip => {
                        trace!(
                            "CompiledMigration: `{}` skipped, input has no `{}`",
                            field, source
                        );
                    }
                    None => {
                        return Err(MigrationError::MissingField {
                            side: self.side.opposite(),
                            field: source.clone(),
                        });
                    }
                },
                Converter::Compute(compute) => {
                    let value =
                        compute
                            .call(input)
                            .map_err(|source| MigrationError::Computation {
                                target: FieldRef::new(self.side, field.as_str()),
                                source,
                            })?;
                    output.insert(field.as_str(), value);
                }
            }
        }
        Ok(output)
    }

    fn plan(&self) -> Vec<FieldPlan> {
        self.fields
            .iter()
            .map(|field| FieldPlan {
                field: FieldRef::new(self.side, field.as_str()),
                source: match self.converters.get(field) {
                    Some(Converter::Copy { source }) => FieldSource::Copied {
                        from: FieldRef::new(self.side.opposite(), source.as_str()),
                    },
                    Some(Converter::Compute(_)) => FieldSource::Computed,
                    None => FieldSource::Omitted,
                },
            })
            .collect()
    }
}

/// Where the value of a field comes from when its side is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    Copied { from: FieldRef },
    Computed,
    /// No converter: the field never appears in produced records.
    Omitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPlan {
    pub field: FieldRef,
    pub source: FieldSource,
}

/// A description of every converter of a compiled migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// How each left field is produced by `reverse`.
    pub left: Vec<FieldPlan>,
    /// How each right field is produced by `forward`.
    pub right: Vec<FieldPlan>,
}

impl MigrationPlan {
    pub fn side(&self, side: Side) -> &[FieldPlan] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn source_of(&self, field: &FieldRef) -> Option<&FieldSource> {
        self.side(field.side)
            .iter()
            .find(|plan| plan.field == *field)
            .map(|plan| &plan.source)
    }
}

/// A pair of conversion functions between left and right records.
///
/// Built once by [`MigrationCompiler`](crate::migration::MigrationCompiler)
/// and never modified afterwards, so a single instance can be shared between
/// threads and called any number of times.
#[derive(Debug, Clone)]
pub struct CompiledMigration {
    left: ConverterTable,
    right: ConverterTable,
    missing_field: MissingFieldPolicy,
}

impl CompiledMigration {
    pub(crate) fn new(
        left: ConverterTable,
        right: ConverterTable,
        missing_field: MissingFieldPolicy,
    ) -> Self {
        Self {
            left,
            right,
            missing_field,
        }
    }

    /// Convert a left record into a right record.
    pub fn forward(&self, left: &Record) -> MigrationResult<Record> {
        let right = self.right.convert(left, self.missing_field)?;
        trace!(
            "CompiledMigration: forward produced {} of {} right fields",
            right.len(),
            self.right.fields.len()
        );
        Ok(right)
    }

    /// Convert a right record into a left record.
    pub fn reverse(&self, right: &Record) -> MigrationResult<Record> {
        let left = self.left.convert(right, self.missing_field)?;
        trace!(
            "CompiledMigration: reverse produced {} of {} left fields",
            left.len(),
            self.left.fields.len()
        );
        Ok(left)
    }

    pub fn plan(&self) -> MigrationPlan {
        MigrationPlan {
            left: self.left.plan(),
            right: self.right.plan(),
        }
    }

    /// Fields of `side` that no conversion into that side can produce.
    pub fn omitted_fields(&self, side: Side) -> Vec<&str> {
        let table = match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        };
        table
            .fields
            .iter()
            .filter(|field| !table.converters.contains_key(*field))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(side: Side, value: serde_json::Value) -> Labels {
        Labels::of(&Record::try_from(value).unwrap(), side, '.')
    }

    fn migration(policy: MissingFieldPolicy) -> CompiledMigration {
        let mut left = ConverterTable::new(&labels(Side::Left, json!({"a": 0, "b": 0})));
        let mut right = ConverterTable::new(&labels(Side::Right, json!({"x": 0, "y": 0, "z": 0})));

        left.install("a", Converter::Copy { source: "x".into() });
        right.install("x", Converter::Copy { source: "a".into() });
        right.install(
            "y",
            Converter::Compute(ComputeFn::new(|left: &Record| {
                json!(format!("{}!", left["a"].as_str().unwrap_or_default()))
            })),
        );

        CompiledMigration::new(left, right, policy)
    }

    #[test]
    fn test_forward_and_reverse_use_their_tables() {
        let migration = migration(MissingFieldPolicy::Error);
        let left = Record::try_from(json!({"a": "hi", "b": 3})).unwrap();

        let right = migration.forward(&left).unwrap();
        assert_eq!(right, Record::try_from(json!({"x": "hi", "y": "hi!"})).unwrap());

        let back = migration.reverse(&right).unwrap();
        assert_eq!(back, Record::try_from(json!({"a": "hi"})).unwrap());
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let migration = migration(MissingFieldPolicy::Error);
        let left = Record::try_from(json!({"a": "hi", "b": 3})).unwrap();
        let snapshot = left.clone();
        migration.forward(&left).unwrap();
        migration.forward(&left).unwrap();
        assert_eq!(left, snapshot);
    }

    #[test]
    fn test_missing_field_policies() {
        let incomplete = Record::try_from(json!({"b": 3})).unwrap();

        match migration(MissingFieldPolicy::Error).forward(&incomplete).unwrap_err() {
            MigrationError::MissingField { side, field } => {
                assert_eq!(side, Side::Left);
                assert_eq!(field, "a");
            }
            other => panic!("unexpected error: {}", other),
        }

        let right = migration(MissingFieldPolicy::Skip).forward(&incomplete).unwrap();
        assert_eq!(right, Record::try_from(json!({"y": "!"})).unwrap());
    }

    #[test]
    fn test_plan_and_omitted_fields() {
        let migration = migration(MissingFieldPolicy::Error);
        let plan = migration.plan();

        assert_eq!(
            plan.source_of(&FieldRef::right("x")),
            Some(&FieldSource::Copied {
                from: FieldRef::left("a")
            })
        );
        assert_eq!(plan.source_of(&FieldRef::right("y")), Some(&FieldSource::Computed));
        assert_eq!(plan.source_of(&FieldRef::right("z")), Some(&FieldSource::Omitted));
        assert_eq!(plan.source_of(&FieldRef::right("nope")), None);

        assert_eq!(migration.omitted_fields(Side::Right), vec!["z"]);
        assert_eq!(migration.omitted_fields(Side::Left), vec!["b"]);

        let serialized = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            serialized["right"][0],
            json!({"field": {"side": "right", "name": "x"}, "source": {"kind": "copied", "from": {"side": "left", "name": "a"}}})
        );
    }
}
