//! Bidirectional field-mapping migrations.
//!
//! A migration converts records of one shape ("left") into records of another
//! shape ("right") and back. Instead of writing both conversion functions by
//! hand, the caller declares per-field rules once and the compiler derives
//! both directions.
//!
//! # Architecture
//!
//! - [`Labels`] name every field of a template record as a [`FieldRef`].
//! - A [`Declaration`] lists `(FieldRef, Rule)` entries, flat or split by side.
//! - [`partition`] splits the entries by the side of their keys in one pass.
//! - [`MigrationCompiler`] expands the entries into one converter per field per
//!   side. A cross-reference rule yields converters in both directions; a
//!   computation rule yields one.
//! - [`CompiledMigration`] runs the converters in `forward` and `reverse`.
//!
//! # Example
//!
//! ```rust
//! use netabase_migrate::prelude::*;
//! use serde_json::json;
//!
//! let left = Record::try_from(json!({"a": "", "b": 0, "c": false, "d": ""})).unwrap();
//! let right = Record::try_from(json!({"e": false, "f": 0, "g": "", "h": ""})).unwrap();
//!
//! let migration = compile(&left, &right, |SideLabels { left, right }| {
//!     Declaration::new()
//!         .cross_ref(&left["a"], &right["g"])
//!         .cross_ref(&left["b"], &right["f"])
//!         .cross_ref(&left["c"], &right["e"])
//!         .compute(&left["d"], |right| {
//!             json!(format!("{}:{}", right["e"], right["g"].as_str().unwrap_or_default()))
//!         })
//!         .compute(&right["h"], |left| {
//!             let d = left["d"].as_str().unwrap_or_default();
//!             json!(d.split(':').next().unwrap_or_default())
//!         })
//! })
//! .unwrap();
//!
//! let forward = migration
//!     .forward(&Record::try_from(json!({"a": "hello", "b": 10, "c": false, "d": "hello: world"})).unwrap())
//!     .unwrap();
//! assert_eq!(Value::from(forward), json!({"e": false, "f": 10, "g": "hello", "h": "hello"}));
//! ```

mod compiled;
mod compiler;
mod declaration;
mod label;
mod partition;

pub use compiled::*;
pub use compiler::*;
pub use declaration::*;
pub use label::*;
pub use partition::*;
