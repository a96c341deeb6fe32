use std::sync::{Arc, Mutex};

use crate::accreditation::domain::{Coordinator, InstitutionCategory, InstitutionId};
use crate::accreditation::registry::{AccreditationService, NewInstitution};
use crate::accreditation::store::{EngineEvent, EventListener, ListenerError, MemoryStore};
use crate::accreditation::InstitutionStatus;

/// Listener capturing every event so tests can assert notifications.
#[derive(Default)]
pub(super) struct RecordingListener {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingListener {
    pub(super) fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("event lock").clone()
    }
}

impl EventListener for RecordingListener {
    fn notify(&self, event: EngineEvent) -> Result<(), ListenerError> {
        self.events.lock().expect("event lock").push(event);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    AccreditationService<MemoryStore, RecordingListener>,
    Arc<MemoryStore>,
    Arc<RecordingListener>,
) {
    let store = Arc::new(MemoryStore::default());
    let listener = Arc::new(RecordingListener::default());
    let service = AccreditationService::new(store.clone(), listener.clone());
    (service, store, listener)
}

pub(super) fn new_institution(code: &str) -> NewInstitution {
    NewInstitution {
        name: format!("{code} Institute of Technology"),
        institution_code: code.to_string(),
        aishe_code: Some("U-0417".to_string()),
        category: InstitutionCategory::Engineering,
        tier: None,
        email: Some(format!("office@{}.ac.in", code.to_lowercase())),
        address: "Basar, Telangana".to_string(),
        established_year: Some(2008),
        coordinator: Coordinator {
            name: "A. Rao".to_string(),
            email: format!("rao@{}.ac.in", code.to_lowercase()),
            phone: "9999999999".to_string(),
        },
        nba_coordinator: None,
        chairman: None,
    }
}

/// Drive a freshly onboarded institution up to pre-qualifiers-completed.
pub(super) fn finish_pre_qualifiers(
    service: &AccreditationService<MemoryStore, RecordingListener>,
    id: &InstitutionId,
) {
    service
        .advance_status(id, InstitutionStatus::PreQualifiersOngoing)
        .expect("begin pre-qualifiers");
    service
        .record_pre_qualifier_progress(id, 100)
        .expect("record pre-qualifier progress");
    service
        .advance_status(id, InstitutionStatus::PreQualifiersCompleted)
        .expect("complete pre-qualifiers");
}
