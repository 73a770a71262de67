//! Field-level comparison of flattened structures.

use crate::canonical::{serialized_eq, try_structural_eq};
use crate::config::DiffConfig;
use crate::diff::{DiffStatus, FieldRow};
use crate::engine::context::{degraded, text_diff_skipped};
use crate::model::summarize_json;
use crate::text_diff::diff_text;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

/// Flattened `dotted.path -> value` pairs of one record.
pub type FieldMap = FxHashMap<String, Value>;

/// Classifies every key of `left ∪ right` and sorts the rows by key.
pub fn diff_fields(left: &FieldMap, right: &FieldMap, config: &DiffConfig) -> Vec<FieldRow> {
    let keys: FxHashSet<&String> = left.keys().chain(right.keys()).collect();
    let limits = config.text_limits();

    let mut rows: Vec<FieldRow> = keys
        .into_iter()
        .map(|key| {
            let l = left.get(key);
            let r = right.get(key);
            let status = match (l, r) {
                (None, Some(_)) => DiffStatus::Added,
                (Some(_), None) => DiffStatus::Removed,
                (Some(a), Some(b)) if values_equal(key, a, b, config) => DiffStatus::Unchanged,
                _ => DiffStatus::Changed,
            };
            let left_text = l.map(format_field_value);
            let right_text = r.map(format_field_value);
            let spans = match (status, &left_text, &right_text) {
                (DiffStatus::Changed, Some(a), Some(b)) => {
                    let spans = diff_text(a, b, limits);
                    if spans.is_none() {
                        text_diff_skipped(config, format_args!("{key}"), a, b);
                    }
                    spans
                }
                _ => None,
            };
            FieldRow {
                key: key.clone(),
                left: left_text,
                right: right_text,
                status,
                spans,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

fn values_equal(key: &str, a: &Value, b: &Value, config: &DiffConfig) -> bool {
    try_structural_eq(a, b).unwrap_or_else(|err| {
        degraded(
            config,
            format_args!("{key}"),
            "compared as serialized text",
            format_args!("{err}"),
        );
        serialized_eq(a, b)
    })
}

/// Display text of a field value: scalars verbatim, the rest as bounded JSON.
pub fn format_field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => summarize_json(other),
    }
}
