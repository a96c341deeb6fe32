//! Accreditation lifecycle engine.
//!
//! Tracks institutions through registration, the three-month pre-qualifier
//! phase, and the six-month Self-Assessment-Report (SAR) phase with one
//! institute-level application plus one application per academic department.
//! The library is the single authority over institution status, phase
//! windows, application dedup, and progress aggregation; presentation code
//! consumes it through [`accreditation::AccreditationService`] or the JSON
//! router in [`accreditation::router`].

pub mod accreditation;
pub mod config;
pub mod error;
pub mod telemetry;

pub use accreditation::{
    accreditation_router, AccreditationService, ApplicationKey, ApplicationStatus, BatchOutcome,
    DashboardStats, Institution, InstitutionCategory, InstitutionId, InstitutionStatus,
    MemoryStore, NewInstitution, PhaseWindow, RegistryError, SarApplication, INSTITUTE_INFO,
};
pub use error::AppError;
