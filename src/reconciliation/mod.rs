//! Driver reconciliation: pairs order/SLA records with the registered-driver
//! roster and labels how confident each pairing is.
//!
//! The matcher itself is pure and never fails. Import, roster storage and the
//! HTTP router sit around it so the control tower can feed exports straight in.

pub mod aliases;
pub mod domain;
pub mod import;
pub mod matcher;
pub(crate) mod normalizer;
pub mod report;
pub mod roster;
pub(crate) mod rules;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aliases::{FieldLayout, FieldResolver, LogicalField};
pub use domain::{CascadeMode, MatchKind, MatchResult, OrderRecord, RosterEntry};
pub use import::ImportError;
pub use matcher::{reconcile, Matcher};
pub use report::{batches, MatchKindCount, ReconciliationSummary};
pub use roster::{RosterError, RosterRepository};
pub use router::reconciliation_router;
pub use service::{ReconciliationOutcome, ReconciliationService, ServiceError};
