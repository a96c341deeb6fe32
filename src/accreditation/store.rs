use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use super::domain::{
    ApplicationKey, Institution, InstitutionId, InstitutionStatus, SarApplication,
};

/// Keyed record store the engine delegates persistence to. `put` is atomic
/// per record and `list_*` reflects every prior `put` (read-after-write).
pub trait RecordStore: Send + Sync {
    fn get_institution(&self, id: &InstitutionId) -> Result<Option<Institution>, StoreError>;
    fn list_institutions(&self) -> Result<Vec<Institution>, StoreError>;
    fn put_institution(&self, record: Institution) -> Result<(), StoreError>;

    fn get_application(&self, key: &ApplicationKey) -> Result<Option<SarApplication>, StoreError>;
    fn list_applications(&self, institution: &InstitutionId)
        -> Result<Vec<SarApplication>, StoreError>;
    fn put_application(&self, record: SarApplication) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Engine events published after each successful mutation. Replaces the
/// original client's ad hoc per-screen refresh notifications with a normal
/// observer on the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum EngineEvent {
    InstitutionOnboarded {
        institution: InstitutionId,
        institution_code: String,
    },
    ApplicationCreated {
        institution: InstitutionId,
        application_id: String,
        department_id: String,
    },
    ProgressRecorded {
        institution: InstitutionId,
        application_id: String,
        percent: u8,
    },
    StatusChanged {
        institution: InstitutionId,
        status: InstitutionStatus,
    },
}

/// Outbound notification hook for dashboards and other read-side consumers.
pub trait EventListener: Send + Sync {
    fn notify(&self, event: EngineEvent) -> Result<(), ListenerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("listener transport unavailable: {0}")]
    Transport(String),
}

/// Listener that forwards engine events to the tracing pipeline.
#[derive(Debug, Default, Clone)]
pub struct LogListener;

impl EventListener for LogListener {
    fn notify(&self, event: EngineEvent) -> Result<(), ListenerError> {
        match &event {
            EngineEvent::InstitutionOnboarded {
                institution,
                institution_code,
            } => info!(%institution, %institution_code, "institution onboarded"),
            EngineEvent::ApplicationCreated {
                institution,
                application_id,
                department_id,
            } => info!(%institution, %application_id, %department_id, "SAR application created"),
            EngineEvent::ProgressRecorded {
                institution,
                application_id,
                percent,
            } => info!(%institution, %application_id, percent, "progress recorded"),
            EngineEvent::StatusChanged {
                institution,
                status,
            } => info!(%institution, status = status.label(), "status changed"),
        }
        Ok(())
    }
}

/// In-process store backing the binary and the test suites. Per-record
/// atomicity comes from the mutex; no cross-record transactions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    institutions: Arc<Mutex<HashMap<InstitutionId, Institution>>>,
    applications: Arc<Mutex<HashMap<ApplicationKey, SarApplication>>>,
}

impl RecordStore for MemoryStore {
    fn get_institution(&self, id: &InstitutionId) -> Result<Option<Institution>, StoreError> {
        let guard = self
            .institutions
            .lock()
            .map_err(|_| StoreError::Unavailable("institution map poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list_institutions(&self) -> Result<Vec<Institution>, StoreError> {
        let guard = self
            .institutions
            .lock()
            .map_err(|_| StoreError::Unavailable("institution map poisoned".to_string()))?;
        let mut records: Vec<Institution> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn put_institution(&self, record: Institution) -> Result<(), StoreError> {
        let mut guard = self
            .institutions
            .lock()
            .map_err(|_| StoreError::Unavailable("institution map poisoned".to_string()))?;
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn get_application(&self, key: &ApplicationKey) -> Result<Option<SarApplication>, StoreError> {
        let guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application map poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn list_applications(
        &self,
        institution: &InstitutionId,
    ) -> Result<Vec<SarApplication>, StoreError> {
        let guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application map poisoned".to_string()))?;
        let mut records: Vec<SarApplication> = guard
            .values()
            .filter(|application| &application.institution_id == institution)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.key.0.cmp(&b.key.0));
        Ok(records)
    }

    fn put_application(&self, record: SarApplication) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application map poisoned".to_string()))?;
        guard.insert(record.key.clone(), record);
        Ok(())
    }
}
