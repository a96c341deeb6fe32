//! Accreditation lifecycle engine: institution status state machine, phase
//! window derivation, SAR application registry, and progress aggregation.
//!
//! The engine is synchronous and single-writer per institution; persistence
//! and notifications go through the traits in [`store`], so the service can
//! run against any keyed record store with per-record atomic writes.

pub mod catalog;
pub mod domain;
pub mod lifecycle;
pub mod progress;
pub mod registry;
pub mod roster;
pub mod router;
pub mod schedule;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::DepartmentCatalog;
pub use domain::{
    ApplicationKey, ApplicationStatus, ContactPerson, Coordinator, DashboardStats, Department,
    Institution, InstitutionCategory, InstitutionId, InstitutionStatus, SarApplication,
    TierCategory, INSTITUTE_INFO,
};
pub use lifecycle::TransitionError;
pub use progress::{classify, dashboard_stats, institution_progress, CompletionBand};
pub use registry::{
    AccreditationService, BatchOutcome, NewInstitution, RegistryError, SkipReason,
    SkippedDepartment,
};
pub use roster::{RosterImportError, RosterImportSummary, RosterImporter};
pub use router::accreditation_router;
pub use schedule::{window_for, PhaseWindow};
pub use store::{
    EngineEvent, EventListener, ListenerError, LogListener, MemoryStore, RecordStore, StoreError,
};
