//! Caller-supplied mapping declarations.
//!
//! A [`Declaration`] is an ordered list of `(key, rule)` entries. It can be
//! written flat, with keys from both sides mixed together, or split into a
//! left group and a right group with [`Declaration::split`]. Both shapes
//! normalize to the same list and compile to the same migration.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{ComputeError, MigrationError, MigrationResult};
use crate::migration::label::{FieldRef, Side};
use crate::record::Record;

type ComputeCallback = dyn Fn(&Record) -> Result<Value, ComputeError> + Send + Sync;

/// A derivation of one field from the entire opposite-side record.
#[derive(Clone)]
pub struct ComputeFn(Arc<ComputeCallback>);

impl ComputeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(
            move |record: &Record| -> Result<Value, ComputeError> { Ok(f(record)) },
        ))
    }

    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, ComputeError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, record: &Record) -> Result<Value, ComputeError> {
        (self.0)(record)
    }
}

impl fmt::Debug for ComputeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComputeFn(..)")
    }
}

/// How the value of a declared field is obtained.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The field equals the referenced field of the opposite side, in both
    /// directions.
    CrossRef(FieldRef),
    /// The field is computed from the opposite-side record, in one direction.
    Compute(ComputeFn),
}

impl Rule {
    pub fn cross_ref(target: &FieldRef) -> Self {
        Rule::CrossRef(target.clone())
    }

    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Rule::Compute(ComputeFn::new(f))
    }

    pub fn try_compute<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, ComputeError> + Send + Sync + 'static,
    {
        Rule::Compute(ComputeFn::fallible(f))
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, Rule::Compute(_))
    }
}

/// One declared `(key, rule)` pair.
#[derive(Debug, Clone)]
pub struct DeclarationEntry {
    /// The group the entry was written in when the split shape is used.
    pub group: Option<Side>,
    pub key: FieldRef,
    pub rule: Rule,
}

/// An ordered list of field rules.
///
/// # Example
///
/// ```
/// use netabase_migrate::{Declaration, FieldRef};
/// use serde_json::json;
///
/// let flat = Declaration::new()
///     .cross_ref(&FieldRef::left("a"), &FieldRef::right("g"))
///     .compute(&FieldRef::right("h"), |left| json!(left["a"]));
/// assert_eq!(flat.len(), 2);
///
/// let split = Declaration::split(
///     Declaration::new().cross_ref(&FieldRef::left("a"), &FieldRef::right("g")),
///     Declaration::new().compute(&FieldRef::right("h"), |left| json!(left["a"])),
/// );
/// assert_eq!(split.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    entries: Vec<DeclarationEntry>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine a group keyed by left labels and a group keyed by right labels.
    pub fn split(left: Declaration, right: Declaration) -> Self {
        let tag = |group: Side, declaration: Declaration| {
            declaration
                .entries
                .into_iter()
                .map(move |entry| DeclarationEntry {
                    group: Some(group),
                    ..entry
                })
        };
        Self {
            entries: tag(Side::Left, left).chain(tag(Side::Right, right)).collect(),
        }
    }

    /// Build a cross-reference declaration from label-string pairs.
    ///
    /// ```
    /// use netabase_migrate::Declaration;
    ///
    /// let declaration =
    ///     Declaration::from_labels([("left.a", "right.g"), ("right.f", "left.b")], '.').unwrap();
    /// assert_eq!(declaration.len(), 2);
    /// assert!(Declaration::from_labels([("left.a", "g")], '.').is_err());
    /// ```
    pub fn from_labels<I, K, T>(pairs: I, separator: char) -> MigrationResult<Self>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(key, target)| {
                let key = FieldRef::parse_label(key.as_ref(), separator)?;
                let target = FieldRef::parse_label(target.as_ref(), separator)?;
                Ok::<_, MigrationError>((key, Rule::CrossRef(target)))
            })
            .collect()
    }

    pub fn entry(mut self, key: FieldRef, rule: Rule) -> Self {
        self.push(key, rule);
        self
    }

    /// Declare that `key` and `target` always hold the same value.
    pub fn cross_ref(self, key: &FieldRef, target: &FieldRef) -> Self {
        self.entry(key.clone(), Rule::cross_ref(target))
    }

    /// Declare that `key` is computed from the opposite-side record.
    pub fn compute<F>(self, key: &FieldRef, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.entry(key.clone(), Rule::compute(f))
    }

    /// Like [`compute`](Self::compute), for derivations that can fail.
    pub fn try_compute<F>(self, key: &FieldRef, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, ComputeError> + Send + Sync + 'static,
    {
        self.entry(key.clone(), Rule::try_compute(f))
    }

    pub fn push(&mut self, key: FieldRef, rule: Rule) {
        self.entries.push(DeclarationEntry {
            group: None,
            key,
            rule,
        });
    }

    pub fn entries(&self) -> &[DeclarationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(FieldRef, Rule)> for Declaration {
    fn from_iter<I: IntoIterator<Item = (FieldRef, Rule)>>(iter: I) -> Self {
        let mut declaration = Self::new();
        declaration.extend(iter);
        declaration
    }
}

impl Extend<(FieldRef, Rule)> for Declaration {
    fn extend<I: IntoIterator<Item = (FieldRef, Rule)>>(&mut self, iter: I) {
        for (key, rule) in iter {
            self.push(key, rule);
        }
    }
}
