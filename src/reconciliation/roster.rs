use super::domain::RosterEntry;

/// Storage abstraction for the registered-driver roster so the service can be
/// exercised without the backend that normally owns it.
pub trait RosterRepository: Send + Sync {
    /// Replaces the stored roster, returning the number of entries kept.
    fn replace(&self, entries: Vec<RosterEntry>) -> Result<usize, RosterError>;
    fn snapshot(&self) -> Result<Vec<RosterEntry>, RosterError>;
}

/// Error enumeration for roster storage and upload failures.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster upload contained no entries")]
    Empty,
    #[error("roster store unavailable: {0}")]
    Unavailable(String),
}
