//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use record_diff::{DiffConfig, DiffStatus, Row, Table, TableDiff, diff_table};
use serde_json::{Value, json};
use std::path::PathBuf;

pub fn fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../fixtures/records");
    path.push(filename);
    path
}

pub fn read_fixture(filename: &str) -> String {
    let path = fixture_path(filename);
    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!("failed to read fixture {}: {e}", path.display());
    })
}

pub fn row(id: &str, cells: &[(&str, Value)]) -> Row {
    Row::with_id(id, cells.iter().map(|(k, v)| (k.to_string(), v.clone())))
}

/// One-column table whose rows are `(id, name)` pairs.
pub fn name_table(rows: &[(&str, &str)]) -> Table {
    Table::new(
        vec!["name".to_string()],
        rows.iter()
            .map(|(id, name)| row(id, &[("name", json!(name))]))
            .collect(),
    )
}

/// Table of `count` distinct rows with ids `1..=count`.
pub fn numbered_table(count: usize) -> Table {
    Table::new(
        vec!["name".to_string(), "qty".to_string()],
        (1..=count)
            .map(|i| {
                row(
                    &i.to_string(),
                    &[
                        ("name", json!(format!("item number {i}"))),
                        ("qty", json!(i * 10)),
                    ],
                )
            })
            .collect(),
    )
}

pub fn diff(left: &Table, right: &Table, config: &DiffConfig) -> TableDiff {
    diff_table("ROOT", Some(left), Some(right), config)
}

pub fn statuses(diff: &TableDiff) -> Vec<DiffStatus> {
    diff.rows.iter().map(|r| r.status).collect()
}
