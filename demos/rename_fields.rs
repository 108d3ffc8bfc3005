//! Upgrade and downgrade user records between two schema versions.
//!
//! Run with `RUST_LOG=debug cargo run --example rename_fields` to see the
//! compiler's log output.

use netabase_migrate::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct UserV1 {
    id: u64,
    name: String,
    email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct UserV2 {
    user_id: u64,
    first_name: String,
    last_name: String,
    contact: String,
}

fn name_part(record: &Record, index: usize) -> Value {
    let name = record["name"].as_str().unwrap_or_default();
    json!(name.split_whitespace().nth(index).unwrap_or_default())
}

fn main() -> MigrationResult<()> {
    env_logger::init();

    let migration = compile_typed(
        &UserV1::default(),
        &UserV2::default(),
        |SideLabels { left, right }| {
            Declaration::new()
                .cross_ref(&left["id"], &right["user_id"])
                .cross_ref(&right["contact"], &left["email"])
                .compute(&right["first_name"], |v1| name_part(v1, 0))
                .compute(&right["last_name"], |v1| name_part(v1, 1))
                .compute(&left["name"], |v2| {
                    json!(format!(
                        "{} {}",
                        v2["first_name"].as_str().unwrap_or_default(),
                        v2["last_name"].as_str().unwrap_or_default()
                    ))
                })
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&migration.as_untyped().plan())?);

    let v1 = UserV1 {
        id: 7,
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
    };
    let v2 = migration.forward(&v1)?;
    println!("upgraded:   {:?}", v2);

    let back = migration.reverse(&v2)?;
    println!("downgraded: {:?}", back);
    assert_eq!(back, v1);

    Ok(())
}
