mod common;

use common::{diff, numbered_table, row};
use record_diff::{DiffConfig, DiffStatus};
use serde_json::json;
use std::rc::Rc;
use std::time::Instant;

#[test]
fn id_fallback_on_50k_rows_stays_linear() {
    let left = numbered_table(50_000);
    let mut right = numbered_table(50_000);
    right.rows[25_000] = Rc::new(row(
        "25001",
        &[("name", json!("item number 25001")), ("qty", json!(-1))],
    ));

    let config = DiffConfig::default();
    let start = Instant::now();
    let result = diff(&left, &right, &config);
    let elapsed_ms = start.elapsed().as_millis();

    assert_eq!(result.rows.len(), 50_000);
    assert_eq!(result.rows[0].group_id, "fallback-0");
    let counts = result.counts();
    assert_eq!(counts.unchanged, 49_999);
    assert_eq!(counts.changed, 1);
    assert_eq!(result.rows[25_000].status, DiffStatus::Changed);
    assert!(
        elapsed_ms < 10_000,
        "50k-row id fallback should finish in <10s, took {elapsed_ms}ms"
    );
}
