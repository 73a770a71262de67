use record_diff::{DiffConfig, DiffStatus, FieldMap, SpanKind, diff_fields, left_text, right_text};
use serde_json::{Value, json};

fn map(entries: &[(&str, Value)]) -> FieldMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn every_key_of_the_union_appears_once_sorted() {
    let left = map(&[("b", json!(1)), ("a", json!("x")), ("d", json!(true))]);
    let right = map(&[("c", json!(2)), ("a", json!("y")), ("d", json!(true))]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());

    let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);

    let statuses: Vec<DiffStatus> = rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            DiffStatus::Changed,
            DiffStatus::Removed,
            DiffStatus::Added,
            DiffStatus::Unchanged,
        ]
    );
}

#[test]
fn added_and_removed_rows_have_one_side() {
    let left = map(&[("gone", json!("old"))]);
    let right = map(&[("new", json!(5))]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());

    let gone = rows.iter().find(|r| r.key == "gone").expect("gone row");
    assert_eq!(gone.left.as_deref(), Some("old"));
    assert_eq!(gone.right, None);
    assert!(gone.spans.is_none());

    let new = rows.iter().find(|r| r.key == "new").expect("new row");
    assert_eq!(new.left, None);
    assert_eq!(new.right.as_deref(), Some("5"));
}

#[test]
fn changed_rows_carry_reconstructible_spans() {
    let left = map(&[("title", json!("Quarterly report"))]);
    let right = map(&[("title", json!("Quarterly review"))]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());

    let spans = rows[0].spans.as_ref().expect("spans for changed field");
    assert_eq!(left_text(spans), "Quarterly report");
    assert_eq!(right_text(spans), "Quarterly review");
    let common: usize = spans
        .iter()
        .filter(|s| s.kind == SpanKind::Equal)
        .map(|s| s.text.chars().count())
        .sum();
    assert_eq!(common, "Quarterly re".len());
}

#[test]
fn structurally_equal_values_are_unchanged() {
    let left = map(&[
        ("obj", json!({"b": 1, "a": [1, 2]})),
        ("num", json!(3.0)),
    ]);
    let right = map(&[
        ("obj", json!({"a": [1, 2], "b": 1})),
        ("num", json!(3)),
    ]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());
    assert!(rows.iter().all(|r| r.status == DiffStatus::Unchanged));
}

#[test]
fn null_and_structured_values_are_stringified() {
    let left = map(&[("n", Value::Null), ("list", json!([1, "two"]))]);
    let right = map(&[("n", json!("")), ("list", json!([1, "two", 3]))]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());

    let list = &rows[0];
    assert_eq!(list.key, "list");
    assert_eq!(list.left.as_deref(), Some(r#"[1,"two"]"#));
    assert_eq!(list.status, DiffStatus::Changed);

    let n = &rows[1];
    assert_eq!(n.left.as_deref(), Some("null"));
    assert_eq!(n.right.as_deref(), Some(""));
    assert_eq!(n.status, DiffStatus::Changed);
}

#[test]
fn guarded_values_have_no_spans() {
    let long = "x".repeat(5_000);
    let left = map(&[("blob", json!(long))]);
    let right = map(&[("blob", json!("short"))]);
    let rows = diff_fields(&left, &right, &DiffConfig::default());
    assert_eq!(rows[0].status, DiffStatus::Changed);
    assert!(rows[0].spans.is_none());
}
