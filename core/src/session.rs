use crate::config::{ConfigError, DiffConfig};
use crate::diff::DiffReport;
use crate::engine::diff_nodes;
use crate::model::Node;
use crate::normalize::parse_json;

/// Holds the configuration shared by successive comparisons.
#[derive(Debug, Clone, Default)]
pub struct DiffSession {
    config: DiffConfig,
}

impl DiffSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiffConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Replaces the configuration; an invalid one leaves the current in place.
    pub fn set_config(&mut self, config: DiffConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn reset_config(&mut self) {
        self.config = DiffConfig::default();
    }

    pub fn diff(&self, left: Option<&Node>, right: Option<&Node>) -> DiffReport {
        diff_nodes(left, right, &self.config)
    }

    /// Parses both texts and diffs them.
    ///
    /// A side that fails to parse is recorded in [`DiffReport::errors`] and
    /// compared as empty; blank text is simply empty.
    pub fn diff_json(&self, left: &str, right: &str) -> DiffReport {
        let mut errors = Vec::new();
        let mut parse_side = |label: &str, text: &str| match parse_json(text) {
            Ok(node) => node,
            Err(err) => {
                errors.push(format!("{label} version: {err}"));
                None
            }
        };
        let left = parse_side("left", left);
        let right = parse_side("right", right);

        let mut report = self.diff(left.as_ref(), right.as_ref());
        for error in errors {
            report.add_error(error);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffStatus;

    #[test]
    fn set_config_rejects_invalid_values() {
        let mut session = DiffSession::new();
        let bad = DiffConfig {
            move_similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(session.set_config(bad).is_err());
        assert_eq!(session.config(), &DiffConfig::default());

        session
            .set_config(DiffConfig::fastest())
            .expect("preset is valid");
        assert!(!session.config().enable_moves);
        session.reset_config();
        assert_eq!(session.config(), &DiffConfig::default());
    }

    #[test]
    fn diff_json_reports_parse_errors_per_side() {
        let session = DiffSession::new();
        let report = session.diff_json("{ broken", r#"{"a": 1}"#);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("left version:"));
        assert_eq!(report.field("a").map(|f| f.status), Some(DiffStatus::Added));
    }

    #[test]
    fn blank_inputs_produce_an_empty_report() {
        let report = DiffSession::new().diff_json("", "   ");
        assert!(report.errors.is_empty());
        assert!(report.fields.is_empty());
        assert!(report.tables.is_empty());
        assert!(!report.has_differences());
    }
}
