//! Heaviest increasing chain over matched rows.
//!
//! Move extraction keeps in place the largest set of matches whose left and
//! right positions both increase; every other match is a move. Among chains
//! of equal length the one with the larger similarity total wins, so an exact
//! match stays put and a near match is the row reported as moved. This choice
//! depends only on the pairs themselves, which keeps the result the same when
//! the two sides are swapped.
//!
//! With matches ordered by right index, a prefix-maximum Fenwick tree keyed by
//! left index finds the best chain ending below each left position in
//! O(k log n).

use std::cmp::Ordering;

/// A 1:1 match between a left row and a right row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowMatch {
    pub left: usize,
    pub right: usize,
    pub similarity: f64,
}

impl RowMatch {
    pub(crate) fn distance(&self) -> usize {
        self.left.abs_diff(self.right)
    }
}

/// Best chain found so far ending at `last` (a position in the match list).
#[derive(Debug, Clone, Copy)]
struct ChainEnd {
    len: usize,
    weight: f64,
    last: Option<usize>,
}

impl ChainEnd {
    const EMPTY: ChainEnd = ChainEnd {
        len: 0,
        weight: 0.0,
        last: None,
    };

    /// Longer first, then heavier, then the later end.
    fn outranks(&self, other: &ChainEnd) -> bool {
        self.len
            .cmp(&other.len)
            .then_with(|| {
                self.weight
                    .partial_cmp(&other.weight)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.last.cmp(&other.last))
            == Ordering::Greater
    }

    fn extend(&self, at: usize, m: &RowMatch) -> ChainEnd {
        ChainEnd {
            len: self.len + 1,
            weight: self.weight + m.similarity,
            last: Some(at),
        }
    }
}

struct PrefixBest {
    tree: Vec<ChainEnd>,
}

impl PrefixBest {
    fn new(keys: usize) -> Self {
        Self {
            tree: vec![ChainEnd::EMPTY; keys + 1],
        }
    }

    /// Best chain whose last left index is below `key`.
    fn below(&self, key: usize) -> ChainEnd {
        let mut best = ChainEnd::EMPTY;
        let mut i = key;
        while i > 0 {
            if self.tree[i].outranks(&best) {
                best = self.tree[i];
            }
            i &= i - 1;
        }
        best
    }

    fn offer(&mut self, key: usize, end: ChainEnd) {
        let mut i = key + 1;
        while i < self.tree.len() {
            if end.outranks(&self.tree[i]) {
                self.tree[i] = end;
            }
            i += i & i.wrapping_neg();
        }
    }
}

/// Positions in `matches` of the rows that stay in place.
///
/// `matches` must be sorted by right index with distinct left and right
/// indices. The result is in ascending order.
pub(crate) fn stable_chain(matches: &[RowMatch]) -> Vec<usize> {
    let Some(max_left) = matches.iter().map(|m| m.left).max() else {
        return Vec::new();
    };

    let mut index = PrefixBest::new(max_left + 1);
    let mut predecessors: Vec<Option<usize>> = vec![None; matches.len()];
    let mut best = ChainEnd::EMPTY;

    for (at, m) in matches.iter().enumerate() {
        let prev = index.below(m.left);
        predecessors[at] = prev.last;
        let end = prev.extend(at, m);
        index.offer(m.left, end);
        if end.outranks(&best) {
            best = end;
        }
    }

    let mut chain = Vec::with_capacity(best.len);
    let mut current = best.last;
    while let Some(at) = current {
        chain.push(at);
        current = predecessors[at];
    }
    chain.reverse();
    chain
}
