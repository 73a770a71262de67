use crate::alignment::SourceRow;
use crate::alignment::fallback::align_rows_by_id;
use crate::diff::{DiffStatus, TableDiffRow};
use crate::engine::context::TableCtx;
use crate::model::ColumnSet;
use crate::similarity::compare_rows;

const DELETE_COST: f64 = 1.0;
const INSERT_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Substitute,
    Delete,
    Insert,
}

/// Aligns two row sequences by minimum edit cost.
///
/// Falls back to id matching when `left.len() * right.len()` exceeds
/// `max_align_cells`. Output rows are in left-to-right order; their indices
/// refer to the rows' positions in the full source tables.
pub(crate) fn align_rows(
    left: &[SourceRow<'_>],
    right: &[SourceRow<'_>],
    columns: &ColumnSet,
    ctx: &TableCtx<'_>,
) -> Vec<TableDiffRow> {
    let n = left.len();
    let m = right.len();

    let cells = (n as u64).saturating_mul(m as u64);
    if cells > ctx.config.max_align_cells {
        ctx.degraded(
            "fallback",
            format_args!("{n}x{m} matrix exceeds {} cells", ctx.config.max_align_cells),
        );
        return align_rows_by_id(left, right, columns);
    }

    let width = m + 1;
    let mut cost = vec![0.0f64; (n + 1) * width];
    let mut steps = vec![Step::Start; (n + 1) * width];

    for i in 1..=n {
        cost[i * width] = cost[(i - 1) * width] + DELETE_COST;
        steps[i * width] = Step::Delete;
    }
    for j in 1..=m {
        cost[j] = cost[j - 1] + INSERT_COST;
        steps[j] = Step::Insert;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cmp = compare_rows(left[i - 1].row, right[j - 1].row, columns);

            let del = cost[(i - 1) * width + j] + DELETE_COST;
            let ins = cost[i * width + (j - 1)] + INSERT_COST;
            let sub = cost[(i - 1) * width + (j - 1)] + cmp.substitution_cost();
            let best = del.min(ins).min(sub);

            cost[i * width + j] = best;
            // Ties prefer substitute, then delete, then insert.
            steps[i * width + j] = if best == sub {
                Step::Substitute
            } else if best == del {
                Step::Delete
            } else {
                Step::Insert
            };
        }
    }

    let mut rows: Vec<TableDiffRow> = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        match steps[i * width + j] {
            Step::Substitute => {
                let l = left[i - 1];
                let r = right[j - 1];
                push_substitution(&mut rows, l, r, columns, ctx);
                i -= 1;
                j -= 1;
            }
            Step::Delete => {
                let l = left[i - 1];
                let id = l.row.display_id.clone();
                ctx.decision(&id, "removed", format_args!("deleted during alignment"));
                rows.push(
                    TableDiffRow::new(id, DiffStatus::Removed, format!("g-{}-d", l.index + 1))
                        .with_left(l.row, l.index),
                );
                i -= 1;
            }
            Step::Insert | Step::Start => {
                let r = right[j - 1];
                let id = r.row.display_id.clone();
                ctx.decision(&id, "added", format_args!("inserted during alignment"));
                rows.push(
                    TableDiffRow::new(id, DiffStatus::Added, format!("g-{}-i", r.index + 1))
                        .with_right(r.row, r.index),
                );
                j -= 1;
            }
        }
    }

    rows.reverse();
    rows
}

/// Emits the output for a substitute step. Rows are collected back to front,
/// so a split pair is pushed `added` first to read `removed`, `added`.
fn push_substitution(
    rows: &mut Vec<TableDiffRow>,
    l: SourceRow<'_>,
    r: SourceRow<'_>,
    columns: &ColumnSet,
    ctx: &TableCtx<'_>,
) {
    let cmp = compare_rows(l.row, r.row, columns);
    let id = l.row.display_id.clone();
    let (li, rj) = (l.index + 1, r.index + 1);

    if cmp.same {
        ctx.decision(&id, "unchanged", format_args!("content matches"));
        rows.push(
            TableDiffRow::new(id, DiffStatus::Unchanged, format!("g-{li}-{rj}"))
                .with_left(l.row, l.index)
                .with_right(r.row, r.index),
        );
    } else if cmp.similar {
        ctx.decision(
            &id,
            "changed",
            format_args!("matched by similarity {:.3}", cmp.similarity),
        );
        rows.push(
            TableDiffRow::new(id, DiffStatus::Changed, format!("g-{li}-{rj}"))
                .with_left(l.row, l.index)
                .with_right(r.row, r.index),
        );
    } else {
        ctx.decision(
            &id,
            "removed+added",
            format_args!("too different after alignment, similarity {:.3}", cmp.similarity),
        );
        let group = format!("pair-{li}-{rj}");
        rows.push(
            TableDiffRow::new(id.clone(), DiffStatus::Added, group.clone())
                .with_right(r.row, r.index)
                .with_pair(l.row),
        );
        rows.push(
            TableDiffRow::new(id, DiffStatus::Removed, group)
                .with_left(l.row, l.index)
                .with_pair(r.row),
        );
    }
}
