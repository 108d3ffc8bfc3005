//! Migrations between two serde types.
//!
//! Templates and records are ordinary structs; they pass through [`Record`]
//! on the way in and are deserialized on the way out. A struct field that the
//! migration omits must therefore be optional (or defaulted) on the
//! destination type, or the conversion fails with a serialization error.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::MigrationResult;
use crate::migration::{CompiledMigration, Declaration, MigrationCompiler, SideLabels};
use crate::record::Record;

/// A [`CompiledMigration`] between the types `L` and `R`.
///
/// # Example
///
/// ```
/// use netabase_migrate::{Declaration, SideLabels, compile_typed};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct UserV1 {
///     name: String,
/// }
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// struct UserV2 {
///     display_name: String,
/// }
///
/// let migration = compile_typed(&UserV1::default(), &UserV2::default(), |SideLabels { left, right }| {
///     Declaration::new().cross_ref(&left["name"], &right["display_name"])
/// })
/// .unwrap();
///
/// let v2 = migration.forward(&UserV1 { name: "Alice".into() }).unwrap();
/// assert_eq!(v2, UserV2 { display_name: "Alice".into() });
/// assert_eq!(migration.reverse(&v2).unwrap().name, "Alice");
/// ```
pub struct TypedMigration<L, R> {
    inner: CompiledMigration,
    _marker: PhantomData<fn(L) -> R>,
}

impl<L, R> TypedMigration<L, R>
where
    L: Serialize + DeserializeOwned,
    R: Serialize + DeserializeOwned,
{
    pub fn forward(&self, left: &L) -> MigrationResult<R> {
        self.inner
            .forward(&Record::from_serialize(left)?)?
            .into_deserialize()
    }

    pub fn reverse(&self, right: &R) -> MigrationResult<L> {
        self.inner
            .reverse(&Record::from_serialize(right)?)?
            .into_deserialize()
    }
}

impl<L, R> TypedMigration<L, R> {
    pub fn as_untyped(&self) -> &CompiledMigration {
        &self.inner
    }

    pub fn into_untyped(self) -> CompiledMigration {
        self.inner
    }
}

impl<L, R> Clone for TypedMigration<L, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<L, R> std::fmt::Debug for TypedMigration<L, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedMigration")
            .field("left", &std::any::type_name::<L>())
            .field("right", &std::any::type_name::<R>())
            .field("inner", &self.inner)
            .finish()
    }
}

impl MigrationCompiler {
    /// Compile a migration between two serde types, using instances of them
    /// as templates.
    pub fn compile_typed<L, R, F>(
        &self,
        left: &L,
        right: &R,
        declare: F,
    ) -> MigrationResult<TypedMigration<L, R>>
    where
        L: Serialize + DeserializeOwned,
        R: Serialize + DeserializeOwned,
        F: FnOnce(&SideLabels) -> Declaration,
    {
        self.try_compile_typed(left, right, |labels| Ok(declare(labels)))
    }

    /// [`compile_typed`](Self::compile_typed) with a fallible declaration
    /// callback, like [`try_compile`](MigrationCompiler::try_compile).
    pub fn try_compile_typed<L, R, F>(
        &self,
        left: &L,
        right: &R,
        declare: F,
    ) -> MigrationResult<TypedMigration<L, R>>
    where
        L: Serialize + DeserializeOwned,
        R: Serialize + DeserializeOwned,
        F: FnOnce(&SideLabels) -> MigrationResult<Declaration>,
    {
        let inner = self.try_compile(
            &Record::from_serialize(left)?,
            &Record::from_serialize(right)?,
            declare,
        )?;
        Ok(TypedMigration {
            inner,
            _marker: PhantomData,
        })
    }
}

/// [`MigrationCompiler::compile_typed`] with the default options.
pub fn compile_typed<L, R, F>(left: &L, right: &R, declare: F) -> MigrationResult<TypedMigration<L, R>>
where
    L: Serialize + DeserializeOwned,
    R: Serialize + DeserializeOwned,
    F: FnOnce(&SideLabels) -> Declaration,
{
    MigrationCompiler::new().compile_typed(left, right, declare)
}

/// [`MigrationCompiler::try_compile_typed`] with the default options.
pub fn try_compile_typed<L, R, F>(
    left: &L,
    right: &R,
    declare: F,
) -> MigrationResult<TypedMigration<L, R>>
where
    L: Serialize + DeserializeOwned,
    R: Serialize + DeserializeOwned,
    F: FnOnce(&SideLabels) -> MigrationResult<Declaration>,
{
    MigrationCompiler::new().try_compile_typed(left, right, declare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MigrationError;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Before {
        title: String,
        words: u32,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct After {
        heading: String,
        summary: Option<String>,
    }

    fn migration() -> TypedMigration<Before, After> {
        compile_typed(&Before::default(), &After::default(), |SideLabels { left, right }| {
            Declaration::new()
                .cross_ref(&left["title"], &right["heading"])
                .compute(&right["summary"], |before| {
                    json!(format!("{} words", before["words"]))
                })
        })
        .unwrap()
    }

    #[test]
    fn test_typed_forward() {
        let after = migration()
            .forward(&Before {
                title: "Notes".into(),
                words: 12,
            })
            .unwrap();

        assert_eq!(
            after,
            After {
                heading: "Notes".into(),
                summary: Some("12 words".into()),
            }
        );
    }

    #[test]
    fn test_typed_reverse_needs_every_field() {
        let after = After {
            heading: "Notes".into(),
            summary: None,
        };
        // `words` has no converter, and `Before` requires it
        let err = migration().reverse(&after).unwrap_err();
        assert!(matches!(err, MigrationError::Serialization(_)));
    }

    #[test]
    fn test_typed_mistyped_field_is_an_error() {
        let err = try_compile_typed(&Before::default(), &After::default(), |SideLabels { left, right }| {
            Ok(Declaration::new().cross_ref(left.field("titel")?, right.field("heading")?))
        })
        .unwrap_err();

        assert!(matches!(
            err,
            MigrationError::UnknownField { ref field, .. } if field == "titel"
        ));
    }

    #[test]
    fn test_untyped_view() {
        let migration = migration();
        let record = migration
            .as_untyped()
            .forward(&Record::new().with("title", "T").with("words", 1))
            .unwrap();
        assert_eq!(record["heading"], json!("T"));
        assert!(format!("{:?}", migration).contains("TypedMigration"));
    }
}
