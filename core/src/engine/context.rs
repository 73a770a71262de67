use crate::config::DiffConfig;
use log::{debug, info};
use std::fmt;

/// Log target for per-row alignment decisions.
pub const DECISION_TARGET: &str = "record_diff::decision";

/// Per-table state shared by move extraction, alignment and cell diffing.
pub(crate) struct TableCtx<'a> {
    pub(crate) path: &'a str,
    pub(crate) config: &'a DiffConfig,
}

impl<'a> TableCtx<'a> {
    pub(crate) fn new(path: &'a str, config: &'a DiffConfig) -> Self {
        Self { path, config }
    }

    /// Records why a row received its status.
    pub(crate) fn decision(&self, id: &str, status: &str, reason: fmt::Arguments<'_>) {
        if self.config.log_decisions {
            debug!(target: DECISION_TARGET, "{} :: {} -> {}. reason: {}", self.path, id, status, reason);
        }
    }

    /// Records a switch to a cheaper strategy.
    pub(crate) fn degraded(&self, what: &str, reason: fmt::Arguments<'_>) {
        degraded(self.config, format_args!("{}", self.path), what, reason);
    }
}

/// Records a switch to a cheaper strategy for `scope` (a table path, field
/// key, or table cell). Silent unless `log_decisions` is set.
pub(crate) fn degraded(
    config: &DiffConfig,
    scope: fmt::Arguments<'_>,
    what: &str,
    reason: fmt::Arguments<'_>,
) {
    if config.log_decisions {
        info!(target: DECISION_TARGET, "{} :: {}: {}", scope, what, reason);
    }
}

/// Logs a text diff the size guards refused.
pub(crate) fn text_diff_skipped(
    config: &DiffConfig,
    scope: fmt::Arguments<'_>,
    left: &str,
    right: &str,
) {
    degraded(
        config,
        scope,
        "text diff skipped",
        format_args!(
            "{}x{} characters exceed the guards",
            left.chars().count(),
            right.chars().count()
        ),
    );
}
