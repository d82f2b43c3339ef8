use tracing::debug;

use super::domain::{CascadeMode, MatchResult, OrderRecord, RosterEntry};
use super::rules::{Candidate, MatchKeys, Rule};

/// Pairs order records with roster entries using the rule cascade.
///
/// For every record the rules are tried in precedence order; within a rule
/// the roster is scanned in its given order and the first satisfying entry
/// wins. The roster is only read, so the same slice can back any number of
/// calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    mode: CascadeMode,
}

impl Matcher {
    pub fn new(mode: CascadeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CascadeMode {
        self.mode
    }

    /// Reconciles every matchable record. Rows with a blank driver name or
    /// hub are left out of the output; everything else yields exactly one
    /// result, in input order.
    pub fn reconcile(&self, records: &[OrderRecord], roster: &[RosterEntry]) -> Vec<MatchResult> {
        let candidates: Vec<Candidate<'_>> = roster.iter().map(Candidate::new).collect();
        let precedence = Rule::precedence(self.mode);

        let results: Vec<MatchResult> = records
            .iter()
            .filter(|record| record.is_matchable())
            .map(|record| match_one(record, &candidates, precedence))
            .collect();

        debug!(
            mode = self.mode.label(),
            records = records.len(),
            roster = roster.len(),
            emitted = results.len(),
            "reconciliation pass finished"
        );

        results
    }
}

/// Reconciles with the default (legacy) precedence.
pub fn reconcile(records: &[OrderRecord], roster: &[RosterEntry]) -> Vec<MatchResult> {
    Matcher::default().reconcile(records, roster)
}

fn match_one(record: &OrderRecord, candidates: &[Candidate<'_>], precedence: &[Rule]) -> MatchResult {
    let keys = MatchKeys::new(&record.driver_name, &record.hub);

    for rule in precedence {
        if let Some(candidate) = candidates
            .iter()
            .find(|candidate| rule.holds(&keys, candidate))
        {
            return MatchResult::matched(record, candidate.entry, rule.kind());
        }
    }

    MatchResult::unmatched(record)
}
