use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{CascadeMode, MatchResult, OrderRecord, RosterEntry};
use super::import::ImportError;
use super::matcher::Matcher;
use super::report::ReconciliationSummary;
use super::roster::{RosterError, RosterRepository};

/// Errors surfaced by the reconciliation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Result of one reconciliation request.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationOutcome {
    pub generated_at: DateTime<Utc>,
    pub cascade: CascadeMode,
    pub roster_size: usize,
    pub summary: ReconciliationSummary,
    pub results: Vec<MatchResult>,
}

/// Service composing the roster repository and the matcher.
pub struct ReconciliationService<R> {
    roster: Arc<R>,
    matcher: Matcher,
}

impl<R> ReconciliationService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(roster: Arc<R>, mode: CascadeMode) -> Self {
        Self {
            roster,
            matcher: Matcher::new(mode),
        }
    }

    pub fn mode(&self) -> CascadeMode {
        self.matcher.mode()
    }

    /// Stores a fresh roster snapshot. An empty upload is rejected so a bad
    /// export cannot silently wipe every phone number.
    pub fn load_roster(&self, entries: Vec<RosterEntry>) -> Result<usize, ServiceError> {
        if entries.is_empty() {
            return Err(RosterError::Empty.into());
        }

        let stored = self.roster.replace(entries)?;
        info!(entries = stored, "roster snapshot replaced");
        Ok(stored)
    }

    pub fn roster(&self) -> Result<Vec<RosterEntry>, ServiceError> {
        Ok(self.roster.snapshot()?)
    }

    /// Reconciles `records` against `inline_roster` when given, otherwise
    /// against the stored snapshot.
    pub fn reconcile(
        &self,
        records: &[OrderRecord],
        inline_roster: Option<Vec<RosterEntry>>,
    ) -> Result<ReconciliationOutcome, ServiceError> {
        let roster = match inline_roster {
            Some(entries) => entries,
            None => self.roster.snapshot()?,
        };

        let results = self.matcher.reconcile(records, &roster);
        let summary = ReconciliationSummary::from_results(records.len(), &results);

        info!(
            cascade = self.mode().label(),
            received = summary.received,
            skipped = summary.skipped,
            matched = summary.matched,
            unmatched = summary.unmatched,
            "reconciliation completed"
        );

        Ok(ReconciliationOutcome {
            generated_at: Utc::now(),
            cascade: self.mode(),
            roster_size: roster.len(),
            summary,
            results,
        })
    }
}
