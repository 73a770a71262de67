//! Character-level diff used for inline highlighting.
//!
//! Spans are produced from a single LCS length table and coalesced into runs,
//! so the `equal` + `delete` spans spell the left text and the `equal` +
//! `insert` spans spell the right text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Equal,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub text: String,
}

/// Size guards for [`diff_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDiffLimits {
    /// Longest accepted input, in characters.
    pub max_len: usize,
    /// Largest accepted `left_len * right_len`.
    pub max_cells: u64,
}

impl Default for TextDiffLimits {
    fn default() -> Self {
        Self {
            max_len: 4_000,
            max_cells: 200_000,
        }
    }
}

impl DiffSpan {
    fn new(kind: SpanKind, ch: char) -> DiffSpan {
        DiffSpan {
            kind,
            text: ch.to_string(),
        }
    }
}

/// Computes the character spans turning `left` into `right`.
///
/// Returns `None` when either input exceeds the guards; callers then show the
/// whole values without inline highlighting. Two empty inputs give an empty
/// span list.
pub fn diff_text(left: &str, right: &str, limits: TextDiffLimits) -> Option<Vec<DiffSpan>> {
    let a: Vec<char> = left.chars().collect();
    let b: Vec<char> = right.chars().collect();
    let n = a.len();
    let m = b.len();

    if n == 0 && m == 0 {
        return Some(Vec::new());
    }
    if (n as u64).saturating_mul(m as u64) > limits.max_cells {
        return None;
    }
    if n > limits.max_len || m > limits.max_len {
        return None;
    }

    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if a[i - 1] == b[j - 1] {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[(i - 1) * width + j].max(table[i * width + (j - 1)])
            };
        }
    }

    // Backtrack from the bottom-right; spans come out in reverse order.
    let mut reversed: Vec<DiffSpan> = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            push_span(&mut reversed, SpanKind::Equal, a[i - 1]);
            i -= 1;
            j -= 1;
        } else if table[(i - 1) * width + j] >= table[i * width + (j - 1)] {
            push_span(&mut reversed, SpanKind::Delete, a[i - 1]);
            i -= 1;
        } else {
            push_span(&mut reversed, SpanKind::Insert, b[j - 1]);
            j -= 1;
        }
    }
    while i > 0 {
        push_span(&mut reversed, SpanKind::Delete, a[i - 1]);
        i -= 1;
    }
    while j > 0 {
        push_span(&mut reversed, SpanKind::Insert, b[j - 1]);
        j -= 1;
    }

    reversed.reverse();
    for span in &mut reversed {
        // Characters were appended back to front within each run.
        span.text = span.text.chars().rev().collect();
    }
    Some(reversed)
}

fn push_span(spans: &mut Vec<DiffSpan>, kind: SpanKind, ch: char) {
    match spans.last_mut() {
        Some(last) if last.kind == kind => last.text.push(ch),
        _ => spans.push(DiffSpan::new(kind, ch)),
    }
}

/// Rebuilds the left text from `equal` and `delete` spans.
pub fn left_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|span| span.kind != SpanKind::Insert)
        .map(|span| span.text.as_str())
        .collect()
}

/// Rebuilds the right text from `equal` and `insert` spans.
pub fn right_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|span| span.kind != SpanKind::Delete)
        .map(|span| span.text.as_str())
        .collect()
}
