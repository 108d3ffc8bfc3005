//! Compiler configuration.
//!
//! Options are built with `typed-builder`, the same way the store backends
//! are configured, and every option has a default matching the strict
//! behaviour of [`compile`](crate::migration::compile).

use typed_builder::TypedBuilder;

/// Separator placed between the side tag and the field name of a label.
pub const DEFAULT_LABEL_SEPARATOR: char = '.';

/// What a cross-reference converter does when the source record lacks the
/// field it copies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Fail the whole conversion with `MigrationError::MissingField`.
    #[default]
    Error,
    /// Leave the destination field out of the result.
    Skip,
}

/// Options for [`MigrationCompiler`](crate::migration::MigrationCompiler).
///
/// # Examples
///
/// ```
/// use netabase_migrate::config::{CompileOptions, MissingFieldPolicy};
///
/// // Defaults: strict validation, '.' separator, missing fields are errors
/// let options = CompileOptions::default();
/// assert!(options.validate_references);
///
/// // Customize options
/// let options = CompileOptions::builder()
///     .label_separator(':')
///     .missing_field(MissingFieldPolicy::Skip)
///     .build();
/// assert_eq!(options.label_separator, ':');
/// assert!(options.validate_references);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct CompileOptions {
    /// Separator used when rendering or parsing label strings
    #[builder(default = DEFAULT_LABEL_SEPARATOR)]
    pub label_separator: char,

    /// Reject declarations naming fields the templates do not have
    #[builder(default = true)]
    pub validate_references: bool,

    /// Behaviour of cross-reference converters on incomplete input records
    #[builder(default)]
    pub missing_field: MissingFieldPolicy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            label_separator: DEFAULT_LABEL_SEPARATOR,
            validate_references: true,
            missing_field: MissingFieldPolicy::Error,
        }
    }
}

impl CompileOptions {
    /// Fail fast on every malformed declaration and every incomplete record.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Accept declarations as given and drop fields that cannot be read.
    ///
    /// Unknown declaration keys are skipped with a warning, and references to
    /// unknown fields only surface when a record is converted.
    pub fn lenient() -> Self {
        Self {
            validate_references: false,
            missing_field: MissingFieldPolicy::Skip,
            ..Default::default()
        }
    }
}
