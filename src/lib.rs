//! # Netabase Migrate
//!
//! Compile one declarative, bidirectional field mapping between two record
//! shapes into a pair of conversion functions, `forward` and `reverse`.
//!
//! ## Features
//!
//! - **Declare Once**: a field correspondence declared on either side converts
//!   in both directions
//! - **Computed Fields**: any field can be derived from the whole opposite record
//! - **Fail Fast**: references to fields the templates do not have are rejected
//!   at compile time
//! - **Typed or Untyped**: works on JSON-like [`Record`]s or on serde structs
//!
//! ## Quick Start
//!
//! ```rust
//! use netabase_migrate::prelude::*;
//! use serde_json::json;
//!
//! let v1 = Record::try_from(json!({"user_name": "", "age": 0})).unwrap();
//! let v2 = Record::try_from(json!({"name": "", "age_years": 0})).unwrap();
//!
//! let migration = compile(&v1, &v2, |SideLabels { left, right }| {
//!     Declaration::new()
//!         .cross_ref(&left["user_name"], &right["name"])
//!         .cross_ref(&right["age_years"], &left["age"])
//! })
//! .unwrap();
//!
//! let old = Record::try_from(json!({"user_name": "alice", "age": 30})).unwrap();
//! let new = migration.forward(&old).unwrap();
//! assert_eq!(new["name"], json!("alice"));
//! assert_eq!(migration.reverse(&new).unwrap(), old);
//! ```

pub mod config;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod record;
pub mod typed;

pub use config::{CompileOptions, MissingFieldPolicy};
pub use errors::{ComputeError, MigrationError, MigrationResult};
pub use migration::{
    CompiledMigration, Declaration, FieldRef, Labels, MigrationCompiler, MigrationPlan, Rule,
    Side, SideLabels, compile, try_compile,
};
pub use record::Record;
pub use typed::{TypedMigration, compile_typed, try_compile_typed};
