//! Record diffing engine.
//!
//! Provides [`diff_nodes`] for comparing two normalized records and producing
//! a [`DiffReport`] of field and table changes.
//!
//! ## Module Structure
//!
//! - `table_diff`: per-table orchestration (moves, alignment, reinsertion)
//! - `cell_diff`: column-by-column text comparison of matched rows
//! - `context`: per-table state and decision logging

mod cell_diff;
pub(crate) mod context;
mod table_diff;

use crate::config::DiffConfig;
use crate::diff::DiffReport;
use crate::field_diff::diff_fields;
use crate::model::Node;
use crate::normalize::{Collected, collect};

pub use cell_diff::cell_diffs;
pub use context::DECISION_TARGET;
pub use table_diff::{TableMap, diff_table, diff_tables};

/// Diffs two records. A missing side compares as an empty record.
pub fn diff_nodes(left: Option<&Node>, right: Option<&Node>, config: &DiffConfig) -> DiffReport {
    let left = left.map(collect).unwrap_or_default();
    let right = right.map(collect).unwrap_or_default();
    diff_collected(&left, &right, config)
}

/// Diffs two already flattened records.
pub fn diff_collected(left: &Collected, right: &Collected, config: &DiffConfig) -> DiffReport {
    let fields = diff_fields(&left.fields, &right.fields, config);
    let tables = diff_tables(&left.tables, &right.tables, config);
    DiffReport::new(fields, tables)
}
