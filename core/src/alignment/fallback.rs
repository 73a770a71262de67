use crate::alignment::SourceRow;
use crate::diff::{DiffStatus, TableDiffRow};
use crate::model::ColumnSet;
use rustc_hash::{FxHashMap, FxHashSet};

/// Id-keyed matching used when the DP matrix would be too large.
///
/// Each side is keyed by display id (1-based position when a row has none);
/// a later row with a repeated id replaces the earlier one. Output follows the
/// first-seen order of ids, left side first. Runs in O(n + m).
pub(crate) fn align_rows_by_id(
    left: &[SourceRow<'_>],
    right: &[SourceRow<'_>],
    columns: &ColumnSet,
) -> Vec<TableDiffRow> {
    let mut order = IdOrder::with_capacity(left.len().max(right.len()));
    let left_map = index_by_id(left, &mut order);
    let right_map = index_by_id(right, &mut order);

    order
        .ids
        .into_iter()
        .enumerate()
        .map(|(k, id)| {
            let l = left_map.get(&id).copied();
            let r = right_map.get(&id).copied();
            let status = match (l, r) {
                (Some(a), Some(b)) if a.row.content_eq(b.row, columns) => DiffStatus::Unchanged,
                (Some(_), Some(_)) => DiffStatus::Changed,
                (Some(_), None) => DiffStatus::Removed,
                _ => DiffStatus::Added,
            };

            let mut row = TableDiffRow::new(id, status, format!("fallback-{k}"));
            if let Some(l) = l {
                row = row.with_left(l.row, l.index);
            }
            if let Some(r) = r {
                row = row.with_right(r.row, r.index);
            }
            row
        })
        .collect()
}

fn fallback_id(source: &SourceRow<'_>) -> String {
    if source.row.display_id.is_empty() {
        (source.index + 1).to_string()
    } else {
        source.row.display_id.clone()
    }
}

/// Ids in first-seen order across both sides.
struct IdOrder {
    ids: Vec<String>,
    seen: FxHashSet<String>,
}

impl IdOrder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            seen: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn note(&mut self, id: &str) {
        if !self.seen.contains(id) {
            self.seen.insert(id.to_string());
            self.ids.push(id.to_string());
        }
    }
}

fn index_by_id<'a>(rows: &[SourceRow<'a>], order: &mut IdOrder) -> FxHashMap<String, SourceRow<'a>> {
    let mut map: FxHashMap<String, SourceRow<'a>> =
        FxHashMap::with_capacity_and_hasher(rows.len(), Default::default());
    for source in rows {
        let id = fallback_id(source);
        order.note(&id);
        map.insert(id, *source);
    }
    map
}
