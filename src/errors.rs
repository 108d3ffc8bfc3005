use thiserror::Error;

use crate::migration::{FieldRef, Side};

pub type MigrationResult<T> = Result<T, MigrationError>;

/// Error returned by a computation rule.
///
/// Anything implementing `std::error::Error` converts into it with `?`, and so
/// does a plain `&str` or `String` through `.into()`.
pub type ComputeError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Unknown Field: `{field}` is not a field of the {side} record")]
    UnknownField { side: Side, field: String },

    #[error("Malformed Reference: {key} cannot refer to {target}")]
    MalformedReference { key: FieldRef, target: FieldRef },

    #[error("Wrong Side: {key} was declared in the {group} group")]
    WrongSide { group: Side, key: FieldRef },

    #[error("Invalid Label: {0}")]
    InvalidLabel(String),

    #[error("Missing Field: {side} record has no field `{field}`")]
    MissingField { side: Side, field: String },

    #[error("Computation Error for {target}: {source}")]
    Computation {
        target: FieldRef,
        #[source]
        source: ComputeError,
    },

    #[error("Not A Record: expected a JSON object, found {0}")]
    NotARecord(String),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}
