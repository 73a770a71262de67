//! Configuration for the diff engine.
//!
//! `DiffConfig` centralizes the alignment thresholds and behavioral knobs so
//! that the engine functions never read ambient state: every comparison gets
//! the configuration it runs with passed in explicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Ceiling on `left_rows * right_rows` before the DP aligner is skipped
    /// in favor of id-keyed matching.
    #[serde(alias = "maxAlignCells")]
    pub max_align_cells: u64,
    /// Emit one log event per alignment decision and per degradation.
    #[serde(alias = "logDecisions")]
    pub log_decisions: bool,
    #[serde(alias = "moveSimilarityThreshold")]
    pub move_similarity_threshold: f64,
    /// Candidate pairs above this count disable move detection for a table.
    #[serde(alias = "moveMaxPairs")]
    pub move_max_pairs: u32,
    pub enable_moves: bool,
    /// Longest input (in characters) for which inline text spans are computed.
    pub text_diff_max_len: u32,
    /// Largest `left_len * right_len` for which inline text spans are computed.
    pub text_diff_max_cells: u64,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_align_cells: 50_000,
            log_decisions: false,
            move_similarity_threshold: 0.8,
            move_max_pairs: 5_000,
            enable_moves: true,
            text_diff_max_len: 4_000,
            text_diff_max_cells: 200_000,
        }
    }
}

impl DiffConfig {
    pub fn fastest() -> Self {
        Self {
            max_align_cells: 10_000,
            enable_moves: false,
            text_diff_max_len: 1_000,
            text_diff_max_cells: 50_000,
            ..Default::default()
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    pub fn most_precise() -> Self {
        Self {
            max_align_cells: 250_000,
            move_similarity_threshold: 0.9,
            move_max_pairs: 20_000,
            ..Default::default()
        }
    }

    pub fn builder() -> DiffConfigBuilder {
        DiffConfigBuilder {
            inner: DiffConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.move_similarity_threshold.is_finite()
            || self.move_similarity_threshold < 0.0
            || self.move_similarity_threshold > 1.0
        {
            return Err(ConfigError::InvalidMoveSimilarity {
                value: self.move_similarity_threshold,
            });
        }

        ensure_non_zero(self.max_align_cells, "max_align_cells")?;
        ensure_non_zero(self.move_max_pairs as u64, "move_max_pairs")?;
        ensure_non_zero(self.text_diff_max_len as u64, "text_diff_max_len")?;
        ensure_non_zero(self.text_diff_max_cells, "text_diff_max_cells")?;

        Ok(())
    }

    pub(crate) fn text_limits(&self) -> crate::text_diff::TextDiffLimits {
        crate::text_diff::TextDiffLimits {
            max_len: self.text_diff_max_len as usize,
            max_cells: self.text_diff_max_cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("move_similarity_threshold must be in [0.0, 1.0] and finite (got {value})")]
    InvalidMoveSimilarity { value: f64 },
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveLimit { field: &'static str, value: u64 },
}

fn ensure_non_zero(value: u64, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveLimit { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DiffConfigBuilder {
    inner: DiffConfig,
}

impl Default for DiffConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffConfigBuilder {
    pub fn new() -> Self {
        DiffConfig::builder()
    }

    pub fn max_align_cells(mut self, value: u64) -> Self {
        self.inner.max_align_cells = value;
        self
    }

    pub fn log_decisions(mut self, value: bool) -> Self {
        self.inner.log_decisions = value;
        self
    }

    pub fn move_similarity_threshold(mut self, value: f64) -> Self {
        self.inner.move_similarity_threshold = value;
        self
    }

    pub fn move_max_pairs(mut self, value: u32) -> Self {
        self.inner.move_max_pairs = value;
        self
    }

    pub fn enable_moves(mut self, value: bool) -> Self {
        self.inner.enable_moves = value;
        self
    }

    pub fn text_diff_max_len(mut self, value: u32) -> Self {
        self.inner.text_diff_max_len = value;
        self
    }

    pub fn text_diff_max_cells(mut self, value: u64) -> Self {
        self.inner.text_diff_max_cells = value;
        self
    }

    pub fn build(self) -> Result<DiffConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let cfg = DiffConfig::default();
        assert_eq!(cfg.max_align_cells, 50_000);
        assert!(!cfg.log_decisions);
        assert!((cfg.move_similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.move_max_pairs, 5_000);
        assert!(cfg.enable_moves);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = DiffConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: DiffConfig = serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn serde_aliases_accept_camel_case_option_names() {
        let json = r#"{
            "maxAlignCells": 1,
            "logDecisions": true,
            "moveSimilarityThreshold": 0.5,
            "moveMaxPairs": 7
        }"#;
        let cfg: DiffConfig = serde_json::from_str(json).expect("deserialize with aliases");
        assert_eq!(cfg.max_align_cells, 1);
        assert!(cfg.log_decisions);
        assert!((cfg.move_similarity_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.move_max_pairs, 7);
        assert_eq!(cfg.text_diff_max_len, 4_000);
    }

    #[test]
    fn builder_rejects_invalid_similarity_threshold() {
        let err = DiffConfig::builder()
            .move_similarity_threshold(2.0)
            .build()
            .expect_err("builder should reject invalid probability");
        assert!(matches!(
            err,
            ConfigError::InvalidMoveSimilarity { value } if (value - 2.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn builder_rejects_zero_ceiling() {
        let err = DiffConfig::builder()
            .max_align_cells(0)
            .build()
            .expect_err("zero ceiling is invalid");
        assert_eq!(
            err,
            ConfigError::NonPositiveLimit {
                field: "max_align_cells",
                value: 0
            }
        );
    }

    #[test]
    fn presets_differ_in_expected_directions() {
        let fastest = DiffConfig::fastest();
        let balanced = DiffConfig::balanced();
        let precise = DiffConfig::most_precise();

        assert!(!fastest.enable_moves);
        assert!(fastest.max_align_cells <= balanced.max_align_cells);
        assert!(precise.max_align_cells >= balanced.max_align_cells);
        assert!(precise.move_similarity_threshold >= balanced.move_similarity_threshold);
        assert!(fastest.validate().is_ok());
        assert!(precise.validate().is_ok());
    }
}
