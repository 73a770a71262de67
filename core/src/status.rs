use crate::diff::{DiffStatus, TableDiffRow};
use serde::Serialize;

/// Row tallies per status. All five statuses are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub changed: usize,
    pub added: usize,
    pub removed: usize,
    pub moved: usize,
    pub unchanged: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: DiffStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: DiffStatus) -> usize {
        match status {
            DiffStatus::Changed => self.changed,
            DiffStatus::Added => self.added,
            DiffStatus::Removed => self.removed,
            DiffStatus::Moved => self.moved,
            DiffStatus::Unchanged => self.unchanged,
        }
    }

    pub fn total(&self) -> usize {
        self.changed + self.added + self.removed + self.moved + self.unchanged
    }

    pub fn merged(&self, other: &StatusCounts) -> StatusCounts {
        StatusCounts {
            changed: self.changed + other.changed,
            added: self.added + other.added,
            removed: self.removed + other.removed,
            moved: self.moved + other.moved,
            unchanged: self.unchanged + other.unchanged,
        }
    }

    fn slot(&mut self, status: DiffStatus) -> &mut usize {
        match status {
            DiffStatus::Changed => &mut self.changed,
            DiffStatus::Added => &mut self.added,
            DiffStatus::Removed => &mut self.removed,
            DiffStatus::Moved => &mut self.moved,
            DiffStatus::Unchanged => &mut self.unchanged,
        }
    }
}

pub fn count_statuses(rows: &[TableDiffRow]) -> StatusCounts {
    rows.iter().fold(StatusCounts::default(), |mut counts, row| {
        counts.record(row.status);
        counts
    })
}
