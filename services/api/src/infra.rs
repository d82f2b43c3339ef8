use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use torre_controle::reconciliation::{CascadeMode, RosterEntry, RosterError, RosterRepository};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Roster snapshot kept in process memory until the next upload.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterRepository {
    entries: Arc<Mutex<Vec<RosterEntry>>>,
}

impl RosterRepository for InMemoryRosterRepository {
    fn replace(&self, entries: Vec<RosterEntry>) -> Result<usize, RosterError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| RosterError::Unavailable("roster lock poisoned".to_string()))?;
        *guard = entries;
        Ok(guard.len())
    }

    fn snapshot(&self) -> Result<Vec<RosterEntry>, RosterError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| RosterError::Unavailable("roster lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

pub(crate) fn parse_cascade(raw: &str) -> Result<CascadeMode, String> {
    CascadeMode::parse(raw)
        .ok_or_else(|| format!("unknown cascade '{raw}' (expected 'legacy' or 'refined')"))
}
