//! Table row alignment.
//!
//! The alignment of one table runs in three phases:
//!
//! 1. **Move extraction** (`move_extraction.rs`)
//!    - Greedy best-first matching of similar rows across the full sequences,
//!      then an LIS filter (`lis.rs`); matches outside the LIS are moves
//!
//! 2. **Edit-distance alignment** (`row_alignment.rs`)
//!    - DP over the rows left after move extraction, with a substitution cost
//!      derived from row similarity; rejected substitutions split into a
//!      removed/added pair
//!
//! 3. **Id fallback** (`fallback.rs`)
//!    - When `left_rows * right_rows` exceeds `max_align_cells` the DP is
//!      skipped and rows are matched by id in O(n + m)
//!
//! Moved rows are spliced back into the aligned output by the table
//! orchestrator in `engine::table_diff`.

pub(crate) mod fallback;
pub(crate) mod lis;
pub(crate) mod move_extraction;
pub(crate) mod row_alignment;

use crate::model::Row;
use std::rc::Rc;

pub(crate) use move_extraction::{RowMove, extract_moves};
pub(crate) use row_alignment::align_rows;

/// A row together with its zero-based position in the full source table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceRow<'a> {
    pub index: usize,
    pub row: &'a Rc<Row>,
}

impl<'a> SourceRow<'a> {
    pub(crate) fn enumerate(rows: &'a [Rc<Row>]) -> Vec<SourceRow<'a>> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| SourceRow { index, row })
            .collect()
    }
}
