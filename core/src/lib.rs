//! Record Diff: a library for comparing semi-structured records.
//!
//! This crate provides functionality for:
//! - Normalizing JSON records into nested structures and tables
//! - Diffing flattened fields with character-level highlighting spans
//! - Aligning table rows (edit-distance DP with an id-keyed fallback)
//! - Detecting rows that moved between versions
//! - Serializing diff reports to JSON and JSON Lines
//!
//! # Quick Start
//!
//! ```
//! use record_diff::{DiffSession, DiffStatus};
//!
//! let session = DiffSession::new();
//! let report = session.diff_json(r#"{"title": "Draft"}"#, r#"{"title": "Final"}"#);
//!
//! let field = report.field("title").unwrap();
//! assert_eq!(field.status, DiffStatus::Changed);
//! ```

pub(crate) mod alignment;
mod canonical;
mod config;
mod diff;
mod engine;
mod field_diff;
mod model;
mod normalize;
mod output;
mod session;
mod similarity;
mod status;
mod text_diff;

pub use canonical::{
    CanonicalError, MAX_CANONICAL_DEPTH, canonicalize, structural_eq, try_structural_eq,
};
pub use config::{ConfigError, DiffConfig, DiffConfigBuilder};
pub use diff::{CellDiff, DiffReport, DiffStatus, FieldRow, MoveInfo, TableDiff, TableDiffRow};
pub use engine::{
    DECISION_TARGET, TableMap, cell_diffs, diff_collected, diff_nodes, diff_table, diff_tables,
};
pub use field_diff::{FieldMap, diff_fields, format_field_value};
pub use model::{ColumnSet, Node, Row, SUMMARY_MAX_CHARS, Structure, Table};
pub use normalize::{Collected, NormalizeError, ROOT_PATH, collect, normalize_value, parse_json};
pub use output::json::{serialize_diff_report, serialize_diff_report_pretty, write_diff_report};
pub use output::json_lines::write_json_lines;
pub use session::DiffSession;
pub use similarity::{
    RowComparison, SIMILAR_ROW_THRESHOLD, TOKEN_SIMILARITY_MIN_LEN, compare_rows, edit_distance,
    row_similarity, text_similarity, token_similarity,
};
pub use status::{StatusCounts, count_statuses};
pub use text_diff::{DiffSpan, SpanKind, TextDiffLimits, diff_text, left_text, right_text};
