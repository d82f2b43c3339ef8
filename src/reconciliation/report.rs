use std::num::NonZeroUsize;

use serde::Serialize;

use super::domain::{MatchKind, MatchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchKindCount {
    pub match_kind: MatchKind,
    pub label: &'static str,
    pub count: usize,
}

/// Totals for one reconciliation pass, for dashboards and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub received: usize,
    pub reconciled: usize,
    pub skipped: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_kind: Vec<MatchKindCount>,
}

impl ReconciliationSummary {
    /// `received` is the number of records handed to the matcher; the
    /// difference to `results.len()` is the number of unmatchable rows.
    pub fn from_results(received: usize, results: &[MatchResult]) -> Self {
        let by_kind: Vec<MatchKindCount> = MatchKind::ALL
            .iter()
            .map(|kind| MatchKindCount {
                match_kind: *kind,
                label: kind.label(),
                count: results.iter().filter(|result| result.is_kind(*kind)).count(),
            })
            .collect();
        let matched = results.iter().filter(|result| result.matched).count();

        Self {
            received,
            reconciled: results.len(),
            skipped: received.saturating_sub(results.len()),
            matched,
            unmatched: results.len() - matched,
            by_kind,
        }
    }

    pub fn count(&self, kind: MatchKind) -> usize {
        self.by_kind
            .iter()
            .find(|entry| entry.match_kind == kind)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Share of reconciled rows that found a roster entry, 0.0 when empty.
    pub fn match_rate(&self) -> f32 {
        if self.reconciled == 0 {
            0.0
        } else {
            self.matched as f32 / self.reconciled as f32
        }
    }
}

/// Partitions results into consecutive chunks of `size` for export; the last
/// chunk holds the remainder.
pub fn batches(results: &[MatchResult], size: NonZeroUsize) -> Vec<&[MatchResult]> {
    results.chunks(size.get()).collect()
}
