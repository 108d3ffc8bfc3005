//! Field labels: which field of which side a declaration talks about.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{MigrationError, MigrationResult};
use crate::record::Record;

/// One of the two record shapes a migration converts between.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A reference to one field of one side.
///
/// [`label`](Self::label) renders it as a label string (`left.name` with the
/// default separator). [`Display`](fmt::Display) does not depend on the
/// separator: `` left field `name` ``.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub side: Side,
    pub name: String,
}

impl FieldRef {
    pub fn new(side: Side, name: impl Into<String>) -> Self {
        Self {
            side,
            name: name.into(),
        }
    }

    pub fn left(name: impl Into<String>) -> Self {
        Self::new(Side::Left, name)
    }

    pub fn right(name: impl Into<String>) -> Self {
        Self::new(Side::Right, name)
    }

    /// Render the label string `side + separator + name`.
    pub fn label(&self, separator: char) -> String {
        format!("{}{}{}", self.side, separator, self.name)
    }

    /// Parse a label string produced by [`label`](Self::label).
    ///
    /// Only the first separator splits, so field names may contain it.
    ///
    /// ```
    /// use netabase_migrate::{FieldRef, Side};
    ///
    /// let field = FieldRef::parse_label("right.address.city", '.').unwrap();
    /// assert_eq!(field.side, Side::Right);
    /// assert_eq!(field.name, "address.city");
    ///
    /// assert!(FieldRef::parse_label("middle.x", '.').is_err());
    /// ```
    pub fn parse_label(label: &str, separator: char) -> MigrationResult<Self> {
        let (tag, name) = label
            .split_once(separator)
            .ok_or_else(|| MigrationError::InvalidLabel(label.to_string()))?;
        let side =
            Side::from_str(tag).map_err(|_| MigrationError::InvalidLabel(label.to_string()))?;
        Ok(Self::new(side, name))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field `{}`", self.side, self.name)
    }
}

/// Field name carried by a label: everything after the first separator.
///
/// A label without a separator resolves to itself.
pub fn resolve_label(label: &str, separator: char) -> &str {
    label
        .split_once(separator)
        .map(|(_, name)| name)
        .unwrap_or(label)
}

/// The labels of every field of one side, in template key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    side: Side,
    separator: char,
    order: Vec<String>,
    fields: HashMap<String, FieldRef>,
}

impl Labels {
    /// Label every field of `template` as belonging to `side`.
    pub fn of(template: &Record, side: Side, separator: char) -> Self {
        let order: Vec<String> = template.field_names().map(str::to_string).collect();
        let fields = order
            .iter()
            .map(|name| (name.clone(), FieldRef::new(side, name.as_str())))
            .collect();
        Self {
            side,
            separator,
            order,
            fields,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn get(&self, name: &str) -> Option<&FieldRef> {
        self.fields.get(name)
    }

    pub fn field(&self, name: &str) -> MigrationResult<&FieldRef> {
        self.get(name).ok_or_else(|| MigrationError::UnknownField {
            side: self.side,
            field: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in template order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Field name → label string, for every field of the side.
    pub fn label_strings(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.label(self.separator)))
            .collect()
    }
}

impl Index<&str> for Labels {
    type Output = FieldRef;

    /// # Panics
    ///
    /// Panics if the side has no field called `name`. Inside
    /// [`try_compile`](crate::migration::MigrationCompiler::try_compile), use
    /// [`Labels::field`] with `?` instead to get an `UnknownField` error.
    fn index(&self, name: &str) -> &FieldRef {
        match self.fields.get(name) {
            Some(field) => field,
            None => panic!("{} record has no field `{}`", self.side, name),
        }
    }
}

/// Labels of both sides, as handed to a declaration callback.
#[derive(Debug, Clone)]
pub struct SideLabels {
    pub left: Labels,
    pub right: Labels,
}

impl SideLabels {
    pub fn of(left: &Record, right: &Record, separator: char) -> Self {
        Self {
            left: Labels::of(left, Side::Left, separator),
            right: Labels::of(right, Side::Right, separator),
        }
    }

    pub fn side(&self, side: Side) -> &Labels {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn template() -> Record {
        Record::try_from(json!({"a": null, "b": null, "x.y": null})).unwrap()
    }

    #[test]
    fn test_side_tags() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.as_ref(), "right");
        assert_eq!(Side::from_str("left").unwrap(), Side::Left);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::iter().collect::<Vec<_>>(), vec![Side::Left, Side::Right]);
    }

    #[test]
    fn test_labeler_covers_every_field() {
        let labels = Labels::of(&template(), Side::Left, '.');
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.names().collect::<Vec<_>>(), vec!["a", "b", "x.y"]);
        assert_eq!(labels["a"], FieldRef::left("a"));

        let strings = labels.label_strings();
        assert_eq!(strings["a"], "left.a");
        assert_eq!(strings["x.y"], "left.x.y");
    }

    #[test]
    fn test_label_round_trip_through_resolver() {
        for side in Side::iter() {
            let labels = Labels::of(&template(), side, '.');
            for (name, label) in labels.label_strings() {
                assert_eq!(resolve_label(&label, '.'), name);
                let parsed = FieldRef::parse_label(&label, '.').unwrap();
                assert_eq!(parsed, labels[name.as_str()]);
            }
        }
    }

    #[test]
    fn test_custom_separator() {
        let labels = Labels::of(&template(), Side::Right, '#');
        assert_eq!(labels.label_strings()["x.y"], "right#x.y");
        assert_eq!(resolve_label("right#x.y", '#'), "x.y");
        assert_eq!(
            FieldRef::parse_label("right#x.y", '#').unwrap(),
            FieldRef::right("x.y")
        );
    }

    #[test]
    fn test_foreign_labels_are_rejected() {
        assert!(matches!(
            FieldRef::parse_label("no_separator", '.'),
            Err(MigrationError::InvalidLabel(_))
        ));
        assert!(matches!(
            FieldRef::parse_label("up.a", '.'),
            Err(MigrationError::InvalidLabel(_))
        ));
        assert_eq!(resolve_label("no_separator", '.'), "no_separator");
    }

    #[test]
    fn test_fallible_lookup() {
        let labels = Labels::of(&template(), Side::Right, '.');
        assert!(labels.contains("b"));
        assert!(labels.get("missing").is_none());
        match labels.field("missing").unwrap_err() {
            MigrationError::UnknownField { side, field } => {
                assert_eq!(side, Side::Right);
                assert_eq!(field, "missing");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    #[should_panic(expected = "no field `nope`")]
    fn test_index_panics_on_unknown_field() {
        let labels = Labels::of(&template(), Side::Left, '.');
        let _ = &labels["nope"];
    }

    #[test]
    fn test_names_keep_template_order() {
        let template = Record::try_from(json!({"zeta": 0, "alpha": 0, "mid": 0})).unwrap();
        let labels = Labels::of(&template, Side::Left, '.');
        assert_eq!(labels.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_field_ref_display() {
        assert_eq!(FieldRef::right("g").to_string(), "right field `g`");
        assert_eq!(FieldRef::right("g").label('.'), "right.g");
        assert_eq!(FieldRef::left("g").label(':'), "left:g");
    }
}
