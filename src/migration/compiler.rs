//! Expansion of declarations into converter tables.

use log::{debug, trace, warn};
use strum::IntoEnumIterator;

use crate::config::CompileOptions;
use crate::errors::{MigrationError, MigrationResult};
use crate::migration::compiled::{CompiledMigration, Converter, ConverterTable};
use crate::migration::declaration::{Declaration, Rule};
use crate::migration::label::{FieldRef, Side, SideLabels};
use crate::migration::partition::{PartitionedRule, partition};
use crate::record::Record;

/// Compiles declarations into [`CompiledMigration`]s.
///
/// For every declared entry keyed under side `S` and field `F`:
///
/// - a computation rule becomes the converter of `S.F`;
/// - a cross-reference to `O.G` on the opposite side becomes two converters,
///   `S.F` copied from `O.G` and `O.G` copied from `S.F`.
///
/// Left-keyed entries are expanded first, then right-keyed entries, each in
/// declaration order. A later entry replaces whatever converter an earlier one
/// installed for the same field; the opposite-side converter installed by a
/// replaced cross-reference stays.
#[derive(Debug, Clone, Default)]
pub struct MigrationCompiler {
    options: CompileOptions,
}

struct Tables {
    left: ConverterTable,
    right: ConverterTable,
}

impl Tables {
    fn side_mut(&mut self, side: Side) -> &mut ConverterTable {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn install(&mut self, side: Side, field: &str, converter: Converter) {
        trace!("MigrationCompiler: installing {:?} for {}.{}", converter, side, field);
        if let Some(previous) = self.side_mut(side).install(field, converter) {
            debug!(
                "MigrationCompiler: {}.{} redeclared, replacing {:?}",
                side, field, previous
            );
        }
    }
}

impl MigrationCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a migration between the field sets of two template records.
    ///
    /// `declare` receives the labels of both sides and returns the rules.
    /// Fields without a rule are left out of converted records.
    ///
    /// # Example
    ///
    /// ```
    /// use netabase_migrate::{Declaration, MigrationCompiler, Record, SideLabels};
    /// use serde_json::json;
    ///
    /// let old = Record::try_from(json!({"name": "", "mail": ""})).unwrap();
    /// let new = Record::try_from(json!({"full_name": "", "email": ""})).unwrap();
    ///
    /// let migration = MigrationCompiler::new()
    ///     .compile(&old, &new, |SideLabels { left, right }| {
    ///         Declaration::new()
    ///             .cross_ref(&left["name"], &right["full_name"])
    ///             .cross_ref(&right["email"], &left["mail"])
    ///     })
    ///     .unwrap();
    ///
    /// let user = Record::try_from(json!({"name": "Ada", "mail": "ada@example.com"})).unwrap();
    /// let upgraded = migration.forward(&user).unwrap();
    /// assert_eq!(upgraded["full_name"], json!("Ada"));
    /// assert_eq!(migration.reverse(&upgraded).unwrap(), user);
    /// ```
    pub fn compile<F>(
        &self,
        left: &Record,
        right: &Record,
        declare: F,
    ) -> MigrationResult<CompiledMigration>
    where
        F: FnOnce(&SideLabels) -> Declaration,
    {
        self.try_compile(left, right, |labels| Ok(declare(labels)))
    }

    /// [`compile`](Self::compile) with a fallible declaration callback.
    ///
    /// Looking fields up with [`Labels::field`](crate::migration::Labels::field)
    /// and `?` turns a mistyped name into an `UnknownField` error instead of
    /// the panic of `labels.left["typo"]`. Any error the callback returns is
    /// returned unchanged.
    ///
    /// ```
    /// use netabase_migrate::{Declaration, MigrationCompiler, MigrationError, Record, SideLabels};
    /// use serde_json::json;
    ///
    /// let old = Record::try_from(json!({"name": ""})).unwrap();
    /// let new = Record::try_from(json!({"full_name": ""})).unwrap();
    ///
    /// let err = MigrationCompiler::new()
    ///     .try_compile(&old, &new, |SideLabels { left, right }| {
    ///         Ok(Declaration::new().cross_ref(left.field("nmae")?, right.field("full_name")?))
    ///     })
    ///     .unwrap_err();
    /// assert!(matches!(err, MigrationError::UnknownField { .. }));
    /// ```
    pub fn try_compile<F>(
        &self,
        left: &Record,
        right: &Record,
        declare: F,
    ) -> MigrationResult<CompiledMigration>
    where
        F: FnOnce(&SideLabels) -> MigrationResult<Declaration>,
    {
        let labels = SideLabels::of(left, right, self.options.label_separator);
        debug!(
            "MigrationCompiler: compiling {} left and {} right fields",
            labels.left.len(),
            labels.right.len()
        );

        let declaration = declare(&labels)?;
        let mut tables = Tables {
            left: ConverterTable::new(&labels.left),
            right: ConverterTable::new(&labels.right),
        };

        let partition = partition(&declaration)?;
        for side in Side::iter() {
            for rule in partition.side(side) {
                self.expand(&labels, &mut tables, side, rule)?;
            }
        }

        let migration = CompiledMigration::new(tables.left, tables.right, self.options.missing_field);
        debug!(
            "MigrationCompiler: compiled {} declarations, {} left and {} right fields omitted",
            declaration.len(),
            migration.omitted_fields(Side::Left).len(),
            migration.omitted_fields(Side::Right).len()
        );
        Ok(migration)
    }

    fn expand(
        &self,
        labels: &SideLabels,
        tables: &mut Tables,
        side: Side,
        rule: &PartitionedRule<'_>,
    ) -> MigrationResult<()> {
        let key = FieldRef::new(side, rule.field);
        if !labels.side(side).contains(rule.field) {
            if self.options.validate_references {
                return Err(MigrationError::UnknownField {
                    side,
                    field: rule.field.to_string(),
                });
            }
            warn!("MigrationCompiler: skipping {}, the template has no such field", key);
            return Ok(());
        }

        match rule.rule {
            Rule::Compute(compute) => {
                tables.install(side, rule.field, Converter::Compute(compute.clone()));
            }
            Rule::CrossRef(target) => {
                if target.side != side.opposite() {
                    return Err(MigrationError::MalformedReference {
                        key,
                        target: target.clone(),
                    });
                }

                tables.install(
                    side,
                    rule.field,
                    Converter::Copy {
                        source: target.name.clone(),
                    },
                );

                if labels.side(target.side).contains(&target.name) {
                    tables.install(
                        target.side,
                        &target.name,
                        Converter::Copy {
                            source: rule.field.to_string(),
                        },
                    );
                } else if self.options.validate_references {
                    return Err(MigrationError::MalformedReference {
                        key,
                        target: target.clone(),
                    });
                } else {
                    warn!(
                        "MigrationCompiler: {} refers to {}, which the {} record does not have",
                        key, target, target.side
                    );
                }
            }
        }
        Ok(())
    }
}

/// Compile a migration with the default [`CompileOptions`].
pub fn compile<F>(left: &Record, right: &Record, declare: F) -> MigrationResult<CompiledMigration>
where
    F: FnOnce(&SideLabels) -> Declaration,
{
    MigrationCompiler::new().compile(left, right, declare)
}

/// [`MigrationCompiler::try_compile`] with the default [`CompileOptions`].
pub fn try_compile<F>(left: &Record, right: &Record, declare: F) -> MigrationResult<CompiledMigration>
where
    F: FnOnce(&SideLabels) -> MigrationResult<Declaration>,
{
    MigrationCompiler::new().try_compile(left, right, declare)
}
