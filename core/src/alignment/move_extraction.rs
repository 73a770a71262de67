use crate::alignment::lis::{RowMatch, stable_chain};
use crate::engine::context::TableCtx;
use crate::model::{ColumnSet, Row};
use crate::similarity::row_similarity;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::rc::Rc;

/// A row matched across sides whose relative position changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowMove {
    pub left_index: usize,
    pub right_index: usize,
    pub similarity: f64,
}

/// Finds rows that moved between `left` and `right`.
///
/// Candidate pairs at or above `move_similarity_threshold` are matched 1:1,
/// best first. Of the matches, the longest (then most similar) chain that
/// keeps its relative order stays in place; every other match is a move.
/// Returned moves are ordered by right index. Swapping the sides swaps each
/// move's indices and nothing else.
pub(crate) fn extract_moves(
    left: &[Rc<Row>],
    right: &[Rc<Row>],
    columns: &ColumnSet,
    ctx: &TableCtx<'_>,
) -> Vec<RowMove> {
    let config = ctx.config;
    if !config.enable_moves || left.is_empty() || right.is_empty() {
        return Vec::new();
    }

    let Some(mut candidates) = collect_candidates(left, right, columns, ctx) else {
        return Vec::new();
    };

    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.distance().cmp(&b.distance()))
            .then_with(|| a.left.min(a.right).cmp(&b.left.min(b.right)))
            .then_with(|| a.left.cmp(&b.left))
    });

    let mut used_left: FxHashSet<usize> = FxHashSet::default();
    let mut used_right: FxHashSet<usize> = FxHashSet::default();
    let mut matches: Vec<RowMatch> = Vec::new();
    for candidate in candidates {
        if used_left.contains(&candidate.left) || used_right.contains(&candidate.right) {
            continue;
        }
        used_left.insert(candidate.left);
        used_right.insert(candidate.right);
        matches.push(candidate);
    }

    if matches.len() < 2 {
        return Vec::new();
    }

    matches.sort_by_key(|m| m.right);
    let stable: FxHashSet<usize> = stable_chain(&matches).into_iter().collect();

    matches
        .iter()
        .enumerate()
        .filter(|(pos, _)| !stable.contains(pos))
        .map(|(_, m)| RowMove {
            left_index: m.left,
            right_index: m.right,
            similarity: m.similarity,
        })
        .collect()
}

/// All pairs scoring at least the move threshold, or `None` once the count
/// passes `move_max_pairs`.
fn collect_candidates(
    left: &[Rc<Row>],
    right: &[Rc<Row>],
    columns: &ColumnSet,
    ctx: &TableCtx<'_>,
) -> Option<Vec<RowMatch>> {
    let threshold = ctx.config.move_similarity_threshold;
    let max_pairs = ctx.config.move_max_pairs as usize;

    let mut candidates = Vec::new();
    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            let similarity = row_similarity(l, r, columns);
            if similarity < threshold {
                continue;
            }
            candidates.push(RowMatch {
                left: i,
                right: j,
                similarity,
            });
            if candidates.len() > max_pairs {
                ctx.degraded(
                    "moves disabled",
                    format_args!("more than {max_pairs} candidate pairs"),
                );
                return None;
            }
        }
    }
    Some(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiffConfig;
    use serde_json::json;

    fn rows(names: &[&str]) -> Vec<Rc<Row>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Rc::new(Row::with_id((i + 1).to_string(), [("name", json!(name))])))
            .collect()
    }

    fn moves(left: &[Rc<Row>], right: &[Rc<Row>], config: &DiffConfig) -> Vec<RowMove> {
        let ctx = TableCtx::new("ROOT", config);
        let columns = ColumnSet::new(vec!["name".to_string()]);
        extract_moves(left, right, &columns, &ctx)
    }

    #[test]
    fn swapped_pair_yields_one_move() {
        let left = rows(&["apple", "banana", "cherry"]);
        let right = rows(&["banana", "apple", "cherry"]);
        let found = moves(&left, &right, &DiffConfig::default());
        assert_eq!(found.len(), 1);
        // Apple and cherry keep their relative order; banana jumped ahead.
        assert_eq!(found[0].left_index, 1);
        assert_eq!(found[0].right_index, 0);
        assert_eq!(found[0].similarity, 1.0);
    }

    #[test]
    fn exact_match_stays_and_near_match_moves_from_either_side() {
        let left = rows(&["grape", "banana"]);
        let right = rows(&["banana", "grapes"]);

        let forward = moves(&left, &right, &DiffConfig::default());
        assert_eq!(forward.len(), 1);
        assert_eq!((forward[0].left_index, forward[0].right_index), (0, 1));
        assert!(forward[0].similarity < 1.0);

        let backward = moves(&right, &left, &DiffConfig::default());
        assert_eq!(backward.len(), 1);
        assert_eq!((backward[0].left_index, backward[0].right_index), (1, 0));
        assert_eq!(backward[0].similarity, forward[0].similarity);
    }

    #[test]
    fn identical_order_has_no_moves() {
        let left = rows(&["apple", "banana", "cherry"]);
        assert!(moves(&left, &left, &DiffConfig::default()).is_empty());
    }

    #[test]
    fn single_match_is_never_a_move() {
        let left = rows(&["apple", "banana"]);
        let right = rows(&["banana", "zzzzzz"]);
        assert!(moves(&left, &right, &DiffConfig::default()).is_empty());
    }

    #[test]
    fn disabled_or_empty_inputs_skip_detection() {
        let left = rows(&["apple", "banana", "cherry"]);
        let right = rows(&["banana", "apple", "cherry"]);
        let config = DiffConfig {
            enable_moves: false,
            ..Default::default()
        };
        assert!(moves(&left, &right, &config).is_empty());
        assert!(moves(&left, &[], &DiffConfig::default()).is_empty());
    }

    #[test]
    fn too_many_candidates_disable_moves() {
        let left = rows(&["same", "same", "same"]);
        let right = rows(&["same", "same", "same"]);
        let config = DiffConfig {
            move_max_pairs: 4,
            ..Default::default()
        };
        assert!(moves(&left, &right, &config).is_empty());
    }

    #[test]
    fn greedy_matching_prefers_the_nearest_equal_candidate() {
        // Every pair is identical, so matches go to the diagonal and nothing moves.
        let left = rows(&["same", "same", "same"]);
        let right = rows(&["same", "same", "same"]);
        assert!(moves(&left, &right, &DiffConfig::default()).is_empty());
    }
}
