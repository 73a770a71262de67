//! Record node model consumed by the diff engine.
//!
//! This module defines the intermediate representation both sides of a
//! comparison are normalized into:
//! - [`Node`]: a closed variant over leaf values, structures and tables
//! - [`Table`]: ordered rows plus an ordered set of column names
//! - [`Row`]: cells keyed by column name, with lazily filled text caches
//! - [`ColumnSet`]: an ordered column list with a precomputed cache key

use rustc_hash::FxHashMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Maximum length (in characters) of a rendered structured value.
pub const SUMMARY_MAX_CHARS: usize = 200;

const SIGNATURE_SEPARATOR: &str = "|";
const COLUMN_KEY_SEPARATOR: &str = "\u{1}";

/// A normalized record node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar, null, or opaque structured payload (e.g. an array).
    Value(serde_json::Value),
    Structure(Structure),
    Table(Table),
}

/// Named fields of a structure. Field order is irrelevant for comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub fields: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Rc<Row>>,
    pub name: Option<String>,
}

/// A single table row.
///
/// # Invariants
///
/// A row is never mutated after construction, so `signature_cache` and
/// `cell_text_cache` can never go stale.
#[derive(Debug)]
pub struct Row {
    pub id: String,
    pub display_id: String,
    pub has_explicit_id: bool,
    pub cells: BTreeMap<String, Node>,
    signature_cache: RefCell<FxHashMap<String, Rc<str>>>,
    cell_text_cache: RefCell<FxHashMap<String, Rc<str>>>,
}

/// Ordered column names plus the key used for per-row signature caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    names: Vec<String>,
    key: String,
}

impl Node {
    pub fn value(value: impl Into<serde_json::Value>) -> Node {
        Node::Value(value.into())
    }

    pub fn null() -> Node {
        Node::Value(serde_json::Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Value(serde_json::Value::Null))
    }

    /// Converts the node back into a plain JSON value.
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Node::Value(value) => value.clone(),
            Node::Structure(structure) => {
                let mut out = serde_json::Map::new();
                for (name, child) in &structure.fields {
                    out.insert(name.clone(), child.to_plain());
                }
                serde_json::Value::Object(out)
            }
            Node::Table(table) => {
                let rows = table
                    .rows
                    .iter()
                    .map(|row| {
                        let mut cells = serde_json::Map::new();
                        for (column, cell) in &row.cells {
                            cells.insert(column.clone(), cell.to_plain());
                        }
                        serde_json::json!({ "id": row.id, "cells": cells })
                    })
                    .collect::<Vec<_>>();
                serde_json::json!({
                    "type": "table",
                    "columns": table.columns,
                    "rows": rows,
                })
            }
        }
    }

    /// Renders the node as display text used for cell comparison.
    pub fn display_text(&self) -> String {
        match self {
            Node::Value(value) => value_text(value),
            Node::Table(table) => format!("[table {}x{}]", table.rows.len(), table.columns.len()),
            Node::Structure(_) => summarize_json(&self.to_plain()),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain().serialize(serializer)
    }
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Table {
        Table {
            columns,
            rows: rows.into_iter().map(Rc::new).collect(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Table {
        self.name = Some(name.into());
        self
    }

    pub fn has_explicit_ids(&self) -> bool {
        self.rows.iter().any(|row| row.has_explicit_id)
    }
}

impl Row {
    pub fn new(
        id: impl Into<String>,
        has_explicit_id: bool,
        cells: BTreeMap<String, Node>,
    ) -> Row {
        let id = id.into();
        Row {
            display_id: id.clone(),
            id,
            has_explicit_id,
            cells,
            signature_cache: RefCell::new(FxHashMap::default()),
            cell_text_cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Builds a row with an explicit id from `(column, value)` pairs.
    pub fn with_id<I, K, V>(id: impl Into<String>, cells: I) -> Row
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        let cells = cells
            .into_iter()
            .map(|(column, value)| (column.into(), Node::Value(value.into())))
            .collect();
        Row::new(id, true, cells)
    }

    pub fn cell(&self, column: &str) -> Option<&Node> {
        self.cells.get(column)
    }

    /// True when the column is present and holds an explicit null.
    pub fn is_null_cell(&self, column: &str) -> bool {
        self.cells.get(column).is_some_and(Node::is_null)
    }

    /// Cached display text of a cell; absent cells render as the empty string.
    pub fn cell_text(&self, column: &str) -> Rc<str> {
        if let Some(text) = self.cell_text_cache.borrow().get(column) {
            return Rc::clone(text);
        }
        let text: Rc<str> = match self.cells.get(column) {
            Some(node) => Rc::from(node.display_text()),
            None => Rc::from(""),
        };
        self.cell_text_cache
            .borrow_mut()
            .insert(column.to_string(), Rc::clone(&text));
        text
    }

    /// Cached concatenation of the cell texts under `columns`.
    pub fn signature(&self, columns: &ColumnSet) -> Rc<str> {
        if let Some(sig) = self.signature_cache.borrow().get(columns.key()) {
            return Rc::clone(sig);
        }
        let parts: Vec<Rc<str>> = columns
            .names()
            .iter()
            .map(|column| self.cell_text(column))
            .collect();
        let joined: Vec<&str> = parts.iter().map(|part| part.as_ref()).collect();
        let sig: Rc<str> = Rc::from(joined.join(SIGNATURE_SEPARATOR));
        self.signature_cache
            .borrow_mut()
            .insert(columns.key().to_string(), Rc::clone(&sig));
        sig
    }

    /// Cell-by-cell text equality under `columns`.
    pub fn content_eq(&self, other: &Row, columns: &ColumnSet) -> bool {
        columns
            .names()
            .iter()
            .all(|column| self.cell_text(column) == other.cell_text(column))
    }
}

impl Clone for Row {
    fn clone(&self) -> Self {
        Row {
            id: self.id.clone(),
            display_id: self.display_id.clone(),
            has_explicit_id: self.has_explicit_id,
            cells: self.cells.clone(),
            signature_cache: RefCell::new(FxHashMap::default()),
            cell_text_cache: RefCell::new(FxHashMap::default()),
        }
    }
}

impl PartialEq for Row {
    /// Caches are derived data and do not take part in equality.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.display_id == other.display_id
            && self.has_explicit_id == other.has_explicit_id
            && self.cells == other.cells
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Row", 3)?;
        state.serialize_field("id", &self.display_id)?;
        state.serialize_field("explicit_id", &self.has_explicit_id)?;
        state.serialize_field("cells", &self.cells)?;
        state.end()
    }
}

impl ColumnSet {
    pub fn new(names: Vec<String>) -> ColumnSet {
        let key = names.join(COLUMN_KEY_SEPARATOR);
        ColumnSet { names, key }
    }

    /// Union of two column lists: left order first, then right-only columns.
    pub fn merged(left: &[String], right: &[String]) -> ColumnSet {
        let mut names: Vec<String> = Vec::with_capacity(left.len() + right.len());
        for name in left.iter().chain(right.iter()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        ColumnSet::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Text of a cell leaf. Null renders as the empty string.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => summarize_json(other),
    }
}

/// Serializes a JSON value and truncates it to [`SUMMARY_MAX_CHARS`].
pub(crate) fn summarize_json(value: &serde_json::Value) -> String {
    let text = serde_json::to_string(value).unwrap_or_else(|_| value.to_string());
    shorten(&text, SUMMARY_MAX_CHARS)
}

/// Truncates `text` to at most `max` characters, ending with an ellipsis.
pub(crate) fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(names: &[&str]) -> ColumnSet {
        ColumnSet::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn cell_text_renders_scalars_and_null() {
        let row = Row::with_id(
            "1",
            [
                ("s", json!("text")),
                ("n", json!(42)),
                ("b", json!(true)),
                ("z", json!(null)),
            ],
        );
        assert_eq!(&*row.cell_text("s"), "text");
        assert_eq!(&*row.cell_text("n"), "42");
        assert_eq!(&*row.cell_text("b"), "true");
        assert_eq!(&*row.cell_text("z"), "");
        assert_eq!(&*row.cell_text("missing"), "");
        assert!(row.is_null_cell("z"));
        assert!(!row.is_null_cell("missing"));
        assert!(!row.is_null_cell("n"));
    }

    #[test]
    fn signature_joins_cells_in_column_order() {
        let row = Row::with_id("1", [("a", json!("x")), ("b", json!(2))]);
        assert_eq!(&*row.signature(&cols(&["b", "a", "c"])), "2|x|");
        assert_eq!(&*row.signature(&cols(&["a"])), "x");
    }

    #[test]
    fn nested_table_cell_renders_dimensions() {
        let inner = Table::new(
            vec!["x".to_string(), "y".to_string()],
            vec![Row::with_id("1", [("x", json!(1))])],
        );
        let mut cells = BTreeMap::new();
        cells.insert("t".to_string(), Node::Table(inner));
        let row = Row::new("1", true, cells);
        assert_eq!(&*row.cell_text("t"), "[table 1x2]");
    }

    #[test]
    fn merged_columns_keep_left_order_then_right_only() {
        let left = vec!["a".to_string(), "b".to_string()];
        let right = vec!["c".to_string(), "a".to_string(), "d".to_string()];
        let merged = ColumnSet::merged(&left, &right);
        assert_eq!(merged.names(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn shorten_truncates_with_ellipsis() {
        assert_eq!(shorten("abcdef", 10), "abcdef");
        assert_eq!(shorten("abcdef", 4), "abc…");
        assert_eq!(shorten("абвгде", 3), "аб…");
    }

    #[test]
    fn clone_drops_caches_but_keeps_equality() {
        let row = Row::with_id("7", [("a", json!("v"))]);
        let _ = row.cell_text("a");
        let copy = row.clone();
        assert_eq!(row, copy);
        assert_eq!(&*copy.cell_text("a"), "v");
    }
}
