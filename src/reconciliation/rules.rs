use super::domain::{CascadeMode, MatchKind, RosterEntry};
use super::normalizer::{first_token, is_approved_status, normalize_key};

/// Normalized comparison keys for one side of a pairing.
#[derive(Debug, Clone)]
pub(crate) struct MatchKeys {
    pub name: String,
    pub hub: String,
}

impl MatchKeys {
    pub fn new(name: &str, hub: &str) -> Self {
        Self {
            name: normalize_key(name),
            hub: normalize_key(hub),
        }
    }

    fn first_token(&self) -> &str {
        first_token(&self.name)
    }
}

/// Roster entry with its keys computed once per reconciliation call.
pub(crate) struct Candidate<'a> {
    pub entry: &'a RosterEntry,
    pub keys: MatchKeys,
    pub approved: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(entry: &'a RosterEntry) -> Self {
        Self {
            entry,
            keys: MatchKeys::new(&entry.driver_name, &entry.hub),
            approved: is_approved_status(entry.status.as_deref()),
        }
    }
}

/// A single labelled rule in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    Exact,
    DriverOnly,
    Partial,
    Approved,
    Similarity,
}

const LEGACY_ORDER: &[Rule] = &[
    Rule::Exact,
    Rule::DriverOnly,
    Rule::Partial,
    Rule::Approved,
    Rule::Similarity,
];

const REFINED_ORDER: &[Rule] = &[Rule::Exact, Rule::DriverOnly, Rule::Approved, Rule::Partial];

impl Rule {
    pub fn precedence(mode: CascadeMode) -> &'static [Rule] {
        match mode {
            CascadeMode::Legacy => LEGACY_ORDER,
            CascadeMode::Refined => REFINED_ORDER,
        }
    }

    pub fn kind(&self) -> MatchKind {
        match self {
            Rule::Exact => MatchKind::Exact,
            Rule::DriverOnly => MatchKind::DriverOnly,
            Rule::Partial => MatchKind::Partial,
            Rule::Approved => MatchKind::Approved,
            Rule::Similarity => MatchKind::Similarity,
        }
    }

    pub fn holds(&self, order: &MatchKeys, candidate: &Candidate<'_>) -> bool {
        let roster = &candidate.keys;
        match self {
            Rule::Exact => order.hub == roster.hub && order.name == roster.name,
            Rule::DriverOnly => names_present(order, roster) && order.name == roster.name,
            Rule::Partial => names_present(order, roster) && tokens_overlap(order, roster),
            Rule::Similarity => similar(order, roster),
            Rule::Approved => similar(order, roster) && candidate.approved,
        }
    }
}

fn names_present(order: &MatchKeys, roster: &MatchKeys) -> bool {
    !order.name.is_empty() && !roster.name.is_empty()
}

// An empty token is a substring of every name.
fn tokens_overlap(order: &MatchKeys, roster: &MatchKeys) -> bool {
    roster.name.contains(order.first_token()) || order.name.contains(roster.first_token())
}

fn similar(order: &MatchKeys, roster: &MatchKeys) -> bool {
    names_present(order, roster) && (order.name == roster.name || tokens_overlap(order, roster))
}
