//! Diff results for record comparison.
//!
//! This module defines the types handed to renderers:
//! - [`FieldRow`]: the status of one flattened field path
//! - [`TableDiff`]: the aligned rows of one table path
//! - [`TableDiffRow`]: one output row with its status, sides and cell diffs
//! - [`DiffReport`]: a versioned collection of both plus input errors

use crate::model::Row;
use crate::status::{StatusCounts, count_statuses};
use crate::text_diff::DiffSpan;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Unchanged,
    Added,
    Removed,
    Changed,
    /// Same (or nearly the same) content at a different relative position.
    Moved,
}

impl DiffStatus {
    pub const ALL: [DiffStatus; 5] = [
        DiffStatus::Changed,
        DiffStatus::Added,
        DiffStatus::Removed,
        DiffStatus::Moved,
        DiffStatus::Unchanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Unchanged => "unchanged",
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Changed => "changed",
            DiffStatus::Moved => "moved",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one flattened field path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRow {
    pub key: String,
    pub left: Option<String>,
    pub right: Option<String>,
    pub status: DiffStatus,
    /// Inline spans for `changed` rows; `None` when not computed or guarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<DiffSpan>>,
}

/// Text comparison of a single column between two rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDiff {
    pub column: String,
    pub left_text: String,
    pub right_text: String,
    /// The left cell is present and explicitly null (as opposed to absent).
    pub left_null: bool,
    pub right_null: bool,
    pub spans: Option<Vec<DiffSpan>>,
}

impl CellDiff {
    pub fn is_equal(&self) -> bool {
        self.left_text == self.right_text && self.left_null == self.right_null
    }
}

/// Where a moved row came from and went to (zero-based source indices).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveInfo {
    pub move_id: String,
    pub from_index: usize,
    pub to_index: usize,
}

/// One aligned output row.
///
/// Invariants (maintained by the table orchestrator):
/// - `unchanged`, `changed` and `moved` rows have both `left` and `right`.
/// - `removed` rows have only `left`; `added` rows have only `right`.
/// - A `removed`/`added` pair split from one rejected match share `group_id`
///   and point at each other's row through `pair`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDiffRow {
    pub id: String,
    pub status: DiffStatus,
    pub left: Option<Rc<Row>>,
    pub right: Option<Rc<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<Rc<Row>>,
    pub group_id: String,
    /// Zero-based position of `left` in the left table.
    pub left_index: Option<usize>,
    /// Zero-based position of `right` in the right table.
    pub right_index: Option<usize>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_info: Option<MoveInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_diffs: Option<Vec<CellDiff>>,
}

impl TableDiffRow {
    pub(crate) fn new(id: String, status: DiffStatus, group_id: String) -> TableDiffRow {
        TableDiffRow {
            id,
            status,
            left: None,
            right: None,
            pair: None,
            group_id,
            left_index: None,
            right_index: None,
            move_info: None,
            cell_diffs: None,
        }
    }

    pub(crate) fn with_left(mut self, row: &Rc<Row>, index: usize) -> TableDiffRow {
        self.left = Some(Rc::clone(row));
        self.left_index = Some(index);
        self
    }

    pub(crate) fn with_right(mut self, row: &Rc<Row>, index: usize) -> TableDiffRow {
        self.right = Some(Rc::clone(row));
        self.right_index = Some(index);
        self
    }

    pub(crate) fn with_pair(mut self, row: &Rc<Row>) -> TableDiffRow {
        self.pair = Some(Rc::clone(row));
        self
    }

    /// The two rows whose cells are compared for this output row.
    pub fn compared_rows(&self) -> Option<(&Rc<Row>, &Rc<Row>)> {
        match (self.status, &self.left, &self.right, &self.pair) {
            (DiffStatus::Removed, Some(left), None, Some(pair)) => Some((left, pair)),
            (DiffStatus::Added, None, Some(right), Some(pair)) => Some((pair, right)),
            (_, Some(left), Some(right), _) => Some((left, right)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDiff {
    pub path: String,
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<TableDiffRow>,
}

impl TableDiff {
    pub fn counts(&self) -> StatusCounts {
        count_statuses(&self.rows)
    }

    pub fn has_differences(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.status != DiffStatus::Unchanged)
    }
}

/// A versioned comparison result.
///
/// `errors` lists inputs that could not be parsed; the report still carries
/// the diff of whatever parsed successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    /// Schema version (currently "1").
    pub version: String,
    pub fields: Vec<FieldRow>,
    pub tables: Vec<TableDiff>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DiffReport {
    pub const SCHEMA_VERSION: &'static str = "1";

    pub fn new(fields: Vec<FieldRow>, tables: Vec<TableDiff>) -> DiffReport {
        DiffReport {
            version: Self::SCHEMA_VERSION.to_string(),
            fields,
            tables,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn field_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for row in &self.fields {
            counts.record(row.status);
        }
        counts
    }

    /// Field and table row counts combined.
    pub fn summary(&self) -> StatusCounts {
        self.tables
            .iter()
            .fold(self.field_counts(), |acc, table| acc.merged(&table.counts()))
    }

    pub fn has_differences(&self) -> bool {
        self.fields
            .iter()
            .any(|row| row.status != DiffStatus::Unchanged)
            || self.tables.iter().any(TableDiff::has_differences)
    }

    pub fn table(&self, path: &str) -> Option<&TableDiff> {
        self.tables.iter().find(|table| table.path == path)
    }

    pub fn field(&self, key: &str) -> Option<&FieldRow> {
        self.fields.iter().find(|row| row.key == key)
    }
}
