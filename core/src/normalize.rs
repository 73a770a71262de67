//! JSON input normalization.
//!
//! Turns parsed JSON into the [`Node`] model and flattens a node tree into
//! the field and table maps the engine diffs:
//! - objects tagged `"type": "table"` become [`Table`]s
//! - objects tagged `"type": "structure"` become [`Structure`]s of their `fields`
//! - arrays and scalars stay opaque [`Node::Value`] leaves
//! - any other object becomes a structure of its members

use crate::engine::TableMap;
use crate::field_diff::FieldMap;
use crate::model::{Node, Row, Structure, Table};
use log::warn;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Path used for a root table or a root leaf value.
pub const ROOT_PATH: &str = "ROOT";

const ID_KEYS: [&str; 3] = ["id", "$id", "key"];

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Flattened view of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub fields: FieldMap,
    pub tables: TableMap,
}

/// Parses and normalizes JSON text. Blank input yields `Ok(None)`.
pub fn parse_json(text: &str) -> Result<Option<Node>, NormalizeError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text).map_err(|err| {
        warn!("invalid JSON input: {err}");
        NormalizeError::from(err)
    })?;
    Ok(Some(normalize_value(&value)))
}

pub fn normalize_value(value: &Value) -> Node {
    let Value::Object(object) = value else {
        return Node::Value(value.clone());
    };

    match object.get("type").and_then(Value::as_str) {
        Some("table") => Node::Table(normalize_table(object)),
        Some("structure") => {
            let fields = match object.get("fields") {
                Some(Value::Object(fields)) => normalize_fields(fields),
                _ => BTreeMap::new(),
            };
            Node::Structure(Structure { fields })
        }
        _ => Node::Structure(Structure {
            fields: normalize_fields(object),
        }),
    }
}

fn normalize_fields(object: &Map<String, Value>) -> BTreeMap<String, Node> {
    object
        .iter()
        .map(|(name, value)| (name.clone(), normalize_value(value)))
        .collect()
}

fn normalize_table(object: &Map<String, Value>) -> Table {
    let mut columns: Vec<String> = match object.get("columns") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    let declared = !columns.is_empty();

    let raw_rows: &[Value] = match object.get("rows") {
        Some(Value::Array(items)) => items,
        _ => &[],
    };

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (index, raw) in raw_rows.iter().enumerate() {
        let (row, seen) = normalize_row(raw, index, &columns);
        if !declared {
            for column in seen {
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        rows.push(row);
    }

    let name = ["name", "title"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string);

    let mut table = Table::new(columns, rows);
    table.name = name;
    table
}

/// Normalizes one row, returning it with its cell names in input order.
fn normalize_row(raw: &Value, index: usize, columns: &[String]) -> (Row, Vec<String>) {
    let object = raw.as_object();

    let explicit_id = object.and_then(|obj| {
        ID_KEYS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|value| !value.is_null())
            .map(id_text)
    });
    let has_explicit_id = explicit_id.is_some();
    let id = explicit_id.unwrap_or_else(|| (index + 1).to_string());

    let source = object.and_then(|obj| {
        ["cells", "values"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|value| !value.is_null())
    });

    let mut cells = BTreeMap::new();
    let mut seen = Vec::new();
    match (source, object) {
        (Some(Value::Array(values)), _) => {
            for (column, value) in columns.iter().zip(values) {
                cells.insert(column.clone(), normalize_value(value));
                seen.push(column.clone());
            }
        }
        (Some(Value::Object(map)), _) | (None, Some(map)) => {
            for (column, value) in map {
                cells.insert(column.clone(), normalize_value(value));
                seen.push(column.clone());
            }
        }
        _ => {}
    }

    (Row::new(id, has_explicit_id, cells), seen)
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flattens `node` into dotted-path fields and tables.
pub fn collect(node: &Node) -> Collected {
    let mut out = Collected::default();
    match node {
        Node::Structure(structure) => collect_structure(structure, "", &mut out),
        Node::Table(table) => {
            out.tables.insert(ROOT_PATH.to_string(), table.clone());
        }
        Node::Value(value) => {
            out.fields.insert(ROOT_PATH.to_string(), value.clone());
        }
    }
    out
}

fn collect_structure(structure: &Structure, prefix: &str, out: &mut Collected) {
    for (name, child) in &structure.fields {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match child {
            Node::Table(table) => {
                out.tables.insert(path, table.clone());
            }
            Node::Structure(nested) => collect_structure(nested, &path, out),
            Node::Value(value) => {
                out.fields.insert(path, value.clone());
            }
        }
    }
}
