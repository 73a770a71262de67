use super::cell_diff::table_cell_diffs;
use super::context::TableCtx;
use crate::alignment::{RowMove, SourceRow, align_rows, extract_moves};
use crate::config::DiffConfig;
use crate::diff::{DiffStatus, MoveInfo, TableDiff, TableDiffRow};
use crate::model::{ColumnSet, Row, Table};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

/// Tables of one record keyed by dotted path (`ROOT` for a root table).
pub type TableMap = FxHashMap<String, Table>;

/// Diffs every table path present on either side, sorted by path.
pub fn diff_tables(left: &TableMap, right: &TableMap, config: &DiffConfig) -> Vec<TableDiff> {
    let mut paths: Vec<&String> = left.keys().chain(right.keys()).collect();
    paths.sort();
    paths.dedup();

    paths
        .into_iter()
        .map(|path| diff_table(path, left.get(path), right.get(path), config))
        .collect()
}

/// Diffs one table path. A missing side is treated as an empty table.
pub fn diff_table(
    path: &str,
    left: Option<&Table>,
    right: Option<&Table>,
    config: &DiffConfig,
) -> TableDiff {
    let left_rows: &[Rc<Row>] = left.map(|t| t.rows.as_slice()).unwrap_or_default();
    let right_rows: &[Rc<Row>] = right.map(|t| t.rows.as_slice()).unwrap_or_default();
    let columns = ColumnSet::merged(
        left.map(|t| t.columns.as_slice()).unwrap_or_default(),
        right.map(|t| t.columns.as_slice()).unwrap_or_default(),
    );
    let ctx = TableCtx::new(path, config);

    let full_cells = (left_rows.len() as u64).saturating_mul(right_rows.len() as u64);
    let moves = if full_cells > config.max_align_cells {
        if config.enable_moves {
            ctx.degraded(
                "moves skipped",
                format_args!("{full_cells} cells exceed {}", config.max_align_cells),
            );
        }
        Vec::new()
    } else {
        extract_moves(left_rows, right_rows, &columns, &ctx)
    };

    let moved_left: FxHashSet<usize> = moves.iter().map(|m| m.left_index).collect();
    let moved_right: FxHashSet<usize> = moves.iter().map(|m| m.right_index).collect();
    let left_rest: Vec<SourceRow<'_>> = SourceRow::enumerate(left_rows)
        .into_iter()
        .filter(|source| !moved_left.contains(&source.index))
        .collect();
    let right_rest: Vec<SourceRow<'_>> = SourceRow::enumerate(right_rows)
        .into_iter()
        .filter(|source| !moved_right.contains(&source.index))
        .collect();

    let mut rows = align_rows(&left_rest, &right_rest, &columns, &ctx);
    for (k, mv) in moves.iter().enumerate() {
        let moved = moved_row(k, mv, left_rows, right_rows, &ctx);
        insert_by_right_index(&mut rows, moved);
    }

    for row in &mut rows {
        let wants_cells = matches!(row.status, DiffStatus::Changed | DiffStatus::Moved)
            || row.pair.is_some();
        if !wants_cells {
            continue;
        }
        if let Some((l, r)) = row.compared_rows() {
            let diffs = table_cell_diffs(&ctx, l, r, &columns);
            row.cell_diffs = Some(diffs);
        }
    }

    let title = left
        .and_then(|t| t.name.clone())
        .or_else(|| right.and_then(|t| t.name.clone()));

    TableDiff {
        path: path.to_string(),
        title,
        columns: columns.into_names(),
        rows,
    }
}

fn moved_row(
    k: usize,
    mv: &RowMove,
    left_rows: &[Rc<Row>],
    right_rows: &[Rc<Row>],
    ctx: &TableCtx<'_>,
) -> TableDiffRow {
    let left = &left_rows[mv.left_index];
    let right = &right_rows[mv.right_index];
    let move_id = format!("move-{k}");
    let id = left.display_id.clone();

    ctx.decision(
        &id,
        "moved",
        format_args!(
            "{} -> {}, similarity {:.3}",
            mv.left_index, mv.right_index, mv.similarity
        ),
    );

    let mut row = TableDiffRow::new(id, DiffStatus::Moved, move_id.clone())
        .with_left(left, mv.left_index)
        .with_right(right, mv.right_index);
    row.move_info = Some(MoveInfo {
        move_id,
        from_index: mv.left_index,
        to_index: mv.right_index,
    });
    row
}

/// Places `row` before the first output row that sits further right.
fn insert_by_right_index(rows: &mut Vec<TableDiffRow>, row: TableDiffRow) {
    let target = row.right_index.unwrap_or(usize::MAX);
    let position = rows
        .iter()
        .position(|existing| existing.right_index.is_some_and(|idx| idx > target));
    match position {
        Some(pos) => rows.insert(pos, row),
        None => rows.push(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(names: &[(&str, &str)]) -> Table {
        Table::new(
            vec!["name".to_string()],
            names
                .iter()
                .map(|(id, name)| Row::with_id(*id, [("name", json!(name))]))
                .collect(),
        )
    }

    fn ids_and_statuses(diff: &TableDiff) -> Vec<(String, DiffStatus)> {
        diff.rows.iter().map(|r| (r.id.clone(), r.status)).collect()
    }

    #[test]
    fn swap_reports_one_move_in_right_order() {
        let left = table(&[("a", "apple"), ("b", "banana"), ("c", "cherry")]);
        let right = table(&[("b", "banana"), ("a", "apple"), ("c", "cherry")]);
        let diff = diff_table("ROOT", Some(&left), Some(&right), &DiffConfig::default());

        assert_eq!(
            ids_and_statuses(&diff),
            vec![
                ("b".to_string(), DiffStatus::Moved),
                ("a".to_string(), DiffStatus::Unchanged),
                ("c".to_string(), DiffStatus::Unchanged),
            ]
        );
        let moved = &diff.rows[0];
        assert_eq!(moved.group_id, "move-0");
        let info = moved.move_info.as_ref().expect("move info");
        assert_eq!((info.from_index, info.to_index), (1, 0));
        assert!(moved.cell_diffs.is_some());
        assert!(diff.rows[1].cell_diffs.is_none());
    }

    #[test]
    fn missing_side_is_all_added() {
        let right = table(&[("1", "x"), ("2", "y")]);
        let diff = diff_table("items", None, Some(&right), &DiffConfig::default());
        assert!(diff.rows.iter().all(|r| r.status == DiffStatus::Added));
        assert_eq!(diff.columns, vec!["name".to_string()]);
    }

    #[test]
    fn changed_rows_carry_cell_diffs() {
        let left = table(&[("1", "alpha")]);
        let right = table(&[("1", "alphb")]);
        let diff = diff_table("ROOT", Some(&left), Some(&right), &DiffConfig::default());
        assert_eq!(diff.rows[0].status, DiffStatus::Changed);
        let cells = diff.rows[0].cell_diffs.as_ref().expect("cell diffs");
        assert_eq!(cells[0].left_text, "alpha");
        assert_eq!(cells[0].right_text, "alphb");
    }

    #[test]
    fn split_pairs_compare_against_their_partner() {
        let left = table(&[("1", "alpha")]);
        let right = table(&[("2", "zzzzzz")]);
        let diff = diff_table("ROOT", Some(&left), Some(&right), &DiffConfig::default());
        for row in &diff.rows {
            let cells = row.cell_diffs.as_ref().expect("cell diffs");
            assert_eq!(cells[0].left_text, "alpha");
            assert_eq!(cells[0].right_text, "zzzzzz");
        }
    }

    #[test]
    fn title_prefers_left_name() {
        let left = table(&[]).with_name("Left");
        let right = table(&[]).with_name("Right");
        let diff = diff_table("t", Some(&left), Some(&right), &DiffConfig::default());
        assert_eq!(diff.title.as_deref(), Some("Left"));
        let diff = diff_table("t", None, Some(&right), &DiffConfig::default());
        assert_eq!(diff.title.as_deref(), Some("Right"));
    }

    #[test]
    fn tables_are_sorted_by_path() {
        let mut left = TableMap::default();
        left.insert("b".to_string(), table(&[("1", "x")]));
        let mut right = TableMap::default();
        right.insert("a".to_string(), table(&[("1", "x")]));
        right.insert("b".to_string(), table(&[("1", "x")]));
        let diffs = diff_tables(&left, &right, &DiffConfig::default());
        let paths: Vec<&str> = diffs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }
}
