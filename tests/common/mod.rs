// Common test utilities and helpers

#![allow(dead_code)]

use netabase_migrate::prelude::*;
use serde_json::json;

/// Install `env_logger` once so `RUST_LOG=trace` shows compiler output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a record from a `json!` object literal
pub fn record(value: Value) -> Record {
    Record::try_from(value).expect("test records are JSON objects")
}

/// Left template: `{a: string, b: number, c: boolean, d: string}`
pub fn left_template() -> Record {
    record(json!({"a": "", "b": 0, "c": false, "d": ""}))
}

/// Right template: `{e: boolean, f: number, g: string, h: string}`
pub fn right_template() -> Record {
    record(json!({"e": false, "f": 0, "g": "", "h": ""}))
}

/// `e + ":" + g`, the way string concatenation renders a boolean
pub fn join_e_g(right: &Record) -> Value {
    let e = match &right["e"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    json!(format!("{}:{}", e, right["g"].as_str().unwrap_or_default()))
}

/// `d.split(":")[0]`
pub fn head_of_d(left: &Record) -> Value {
    let d = left["d"].as_str().unwrap_or_default();
    json!(d.split(':').next().unwrap_or_default())
}
