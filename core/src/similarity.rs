//! Distance and similarity primitives used to score candidate row pairs.

use crate::model::{ColumnSet, Row};
use rustc_hash::FxHashSet;

/// Signatures longer than this (in characters) are compared by token overlap
/// instead of edit distance.
pub const TOKEN_SIMILARITY_MIN_LEN: usize = 300;

/// Rows at or above this similarity are aligned as one changed pair.
pub const SIMILAR_ROW_THRESHOLD: f64 = 0.6;

/// Outcome of comparing two rows under a column set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowComparison {
    /// Every column renders identically on both sides.
    pub same: bool,
    pub similar: bool,
    pub similarity: f64,
}

impl RowComparison {
    /// Substitution cost used by the DP aligner.
    pub fn substitution_cost(&self) -> f64 {
        if self.same {
            0.0
        } else if self.similar {
            1.0 - self.similarity
        } else {
            2.0
        }
    }
}

/// Levenshtein distance over characters (unit insert/delete/substitute cost).
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Jaccard similarity of the lower-cased word sets of `a` and `b`.
pub fn token_similarity(a: &str, b: &str) -> f64 {
    let left = tokenize(a);
    let right = tokenize(b);

    if left.is_empty() && right.is_empty() {
        return 1.0;
    }

    let inter = left.iter().filter(|token| right.contains(*token)).count();
    let union = left.len() + right.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ('\u{0400}'..='\u{04FF}').contains(&ch)
}

fn tokenize(text: &str) -> FxHashSet<String> {
    text.to_lowercase()
        .split(|ch: char| !is_word_char(ch))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Similarity of two strings in `[0, 1]`, picking the strategy by length.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    if max_len > TOKEN_SIMILARITY_MIN_LEN {
        return token_similarity(a, b);
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

/// Similarity of two rows' signatures under `columns`.
pub fn row_similarity(left: &Row, right: &Row, columns: &ColumnSet) -> f64 {
    if left.content_eq(right, columns) {
        return 1.0;
    }
    text_similarity(&left.signature(columns), &right.signature(columns))
}

pub fn compare_rows(left: &Row, right: &Row, columns: &ColumnSet) -> RowComparison {
    if left.content_eq(right, columns) {
        return RowComparison {
            same: true,
            similar: true,
            similarity: 1.0,
        };
    }
    let similarity = text_similarity(&left.signature(columns), &right.signature(columns));
    RowComparison {
        same: false,
        similar: similarity >= SIMILAR_ROW_THRESHOLD,
        similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(names: &[&str]) -> ColumnSet {
        ColumnSet::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn edit_distance_matches_levenshtein() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "ab"), 2);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("ёлка", "елка"), 1);
    }

    #[test]
    fn token_similarity_is_jaccard_over_word_sets() {
        assert_eq!(token_similarity("", "  "), 1.0);
        assert_eq!(token_similarity("a b", "A B b"), 1.0);
        assert!((token_similarity("red green", "green blue") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(token_similarity("Привет мир", "мир ПРИВЕТ"), 1.0);
        assert_eq!(token_similarity("x", ""), 0.0);
    }

    #[test]
    fn long_texts_use_token_overlap() {
        let a = format!("{} tail", "word ".repeat(80));
        let b = format!("{} other", "word ".repeat(80));
        assert!(a.len() > TOKEN_SIMILARITY_MIN_LEN);
        // Token sets {word, tail} and {word, other} share one of three tokens.
        assert!((text_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn row_similarity_uses_edit_ratio_for_short_rows() {
        let columns = cols(&["name"]);
        let a = Row::with_id("1", [("name", json!("alpha"))]);
        let b = Row::with_id("2", [("name", json!("alphb"))]);
        assert!((row_similarity(&a, &b, &columns) - 0.8).abs() < 1e-9);
        assert_eq!(row_similarity(&a, &a, &columns), 1.0);
    }

    #[test]
    fn rows_with_empty_signatures_are_identical() {
        let columns = cols(&["x"]);
        let a = Row::with_id("1", Vec::<(String, serde_json::Value)>::new());
        let b = Row::with_id("2", [("x", json!(null))]);
        let cmp = compare_rows(&a, &b, &columns);
        assert!(cmp.same);
        assert_eq!(cmp.substitution_cost(), 0.0);
    }

    #[test]
    fn dissimilar_rows_cost_as_much_as_delete_plus_insert() {
        let columns = cols(&["name"]);
        let a = Row::with_id("1", [("name", json!("alpha"))]);
        let b = Row::with_id("2", [("name", json!("zzzzzz"))]);
        let cmp = compare_rows(&a, &b, &columns);
        assert!(!cmp.same);
        assert!(!cmp.similar);
        assert_eq!(cmp.substitution_cost(), 2.0);
    }
}
