use super::context::{TableCtx, text_diff_skipped};
use crate::config::DiffConfig;
use crate::diff::CellDiff;
use crate::model::{ColumnSet, Row};
use crate::normalize::ROOT_PATH;
use crate::text_diff::diff_text;

/// Compares `left` and `right` column by column under the merged column set.
pub fn cell_diffs(
    left: &Row,
    right: &Row,
    columns: &ColumnSet,
    config: &DiffConfig,
) -> Vec<CellDiff> {
    table_cell_diffs(&TableCtx::new(ROOT_PATH, config), left, right, columns)
}

pub(crate) fn table_cell_diffs(
    ctx: &TableCtx<'_>,
    left: &Row,
    right: &Row,
    columns: &ColumnSet,
) -> Vec<CellDiff> {
    let limits = ctx.config.text_limits();
    columns
        .names()
        .iter()
        .map(|column| {
            let left_text = left.cell_text(column);
            let right_text = right.cell_text(column);
            let spans = diff_text(&left_text, &right_text, limits);
            if spans.is_none() {
                text_diff_skipped(
                    ctx.config,
                    format_args!("{} row {} column {}", ctx.path, left.display_id, column),
                    &left_text,
                    &right_text,
                );
            }
            CellDiff {
                column: column.clone(),
                left_text: left_text.to_string(),
                right_text: right_text.to_string(),
                left_null: left.is_null_cell(column),
                right_null: right.is_null_cell(column),
                spans,
            }
        })
        .collect()
}
