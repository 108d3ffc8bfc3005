//! Prelude module for convenient imports.
//!
//! ```rust
//! use netabase_migrate::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - [`compile`], [`try_compile`], [`compile_typed`], [`try_compile_typed`] and
//!   [`MigrationCompiler`] for building migrations
//! - [`Declaration`], [`Rule`], [`FieldRef`], [`SideLabels`] for declaring rules
//! - [`CompiledMigration`], [`TypedMigration`] for running them
//! - [`Record`] and `serde_json`'s [`Value`]
//! - [`MigrationError`], [`MigrationResult`] and [`ComputeError`]

pub use crate::config::{CompileOptions, MissingFieldPolicy};
pub use crate::errors::{ComputeError, MigrationError, MigrationResult};
pub use crate::migration::{
    CompiledMigration, Declaration, FieldPlan, FieldRef, FieldSource, Labels, MigrationCompiler,
    MigrationPlan, Rule, Side, SideLabels, compile, try_compile,
};
pub use crate::record::Record;
pub use crate::typed::{TypedMigration, compile_typed, try_compile_typed};
pub use serde_json::Value;
