//! Added/modified/deleted counts from porcelain status output.

use std::fmt;

/// Counts of staged paths per change kind.
///
/// A path can land in more than one bucket: the two status columns are
/// checked independently, so `AM` counts as both added and modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.deleted == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} ~{} -{}", self.added, self.modified, self.deleted)
    }
}

/// Summarize `git status --porcelain` lines.
///
/// Only the two-character status code at the start of each line is looked
/// at; `?` (untracked) and `A` count as added, `M` as modified, `D` as deleted.
pub fn summarize_status<S: AsRef<str>>(lines: &[S]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();

    for line in lines {
        let code: String = line.as_ref().chars().take(2).collect();
        if code.trim().is_empty() {
            continue;
        }

        if code.contains('?') || code.contains('A') {
            summary.added += 1;
        }
        if code.contains('M') {
            summary.modified += 1;
        }
        if code.contains('D') {
            summary.deleted += 1;
        }
    }

    summary
}
