use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::reconciliation::domain::{CascadeMode, OrderRecord, RosterEntry};
use crate::reconciliation::roster::{RosterError, RosterRepository};
use crate::reconciliation::{reconciliation_router, ReconciliationService};

pub(super) fn scenario_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("JOAO SILVA", "SP")
            .with_phone("111")
            .with_status("aprovado"),
        RosterEntry::new("MARIA", "RJ")
            .with_phone("222")
            .with_status(""),
    ]
}

pub(super) fn scenario_records() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new("joao silva", "sp").with_order_number("1001"),
        OrderRecord::new("Maria Souza", "RJ").with_order_number("1002"),
        OrderRecord::new("Carlos", "SP").with_order_number("1003"),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRoster {
    entries: Arc<Mutex<Vec<RosterEntry>>>,
}

impl RosterRepository for MemoryRoster {
    fn replace(&self, entries: Vec<RosterEntry>) -> Result<usize, RosterError> {
        let mut guard = self.entries.lock().expect("roster mutex poisoned");
        *guard = entries;
        Ok(guard.len())
    }

    fn snapshot(&self) -> Result<Vec<RosterEntry>, RosterError> {
        Ok(self.entries.lock().expect("roster mutex poisoned").clone())
    }
}

pub(super) struct UnavailableRoster;

impl RosterRepository for UnavailableRoster {
    fn replace(&self, _entries: Vec<RosterEntry>) -> Result<usize, RosterError> {
        Err(RosterError::Unavailable("backend offline".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<RosterEntry>, RosterError> {
        Err(RosterError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (ReconciliationService<MemoryRoster>, Arc<MemoryRoster>) {
    let roster = Arc::new(MemoryRoster::default());
    let service = ReconciliationService::new(roster.clone(), CascadeMode::Legacy);
    (service, roster)
}

pub(super) fn router_with_service(service: ReconciliationService<MemoryRoster>) -> axum::Router {
    reconciliation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
