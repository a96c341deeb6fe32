use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::DepartmentCatalog;
use super::domain::{
    ApplicationKey, ApplicationStatus, ContactPerson, Coordinator, DashboardStats, Department,
    Institution, InstitutionCategory, InstitutionId, InstitutionStatus, SarApplication,
    TierCategory, INSTITUTE_INFO,
};
use super::lifecycle::{self, TransitionError};
use super::progress;
use super::schedule::{self, PhaseWindow};
use super::store::{EngineEvent, EventListener, ListenerError, RecordStore, StoreError};

/// Onboarding input, one field per entry on the admin onboarding form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInstitution {
    pub name: String,
    pub institution_code: String,
    #[serde(default)]
    pub aishe_code: Option<String>,
    pub category: InstitutionCategory,
    #[serde(default)]
    pub tier: Option<TierCategory>,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub established_year: Option<u16>,
    pub coordinator: Coordinator,
    #[serde(default)]
    pub nba_coordinator: Option<ContactPerson>,
    #[serde(default)]
    pub chairman: Option<ContactPerson>,
}

/// Why a department was skipped during a batch create. The batch itself
/// keeps going; only the offending department is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    #[error("an application already exists as '{application_id}'")]
    DuplicateApplication { application_id: String },
    #[error("department is not part of the institution's catalog")]
    UnknownDepartment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDepartment {
    pub department_id: String,
    pub reason: SkipReason,
}

/// Result of a batch create: the applications actually created, plus a
/// per-department account of everything that was skipped.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    pub created: Vec<SarApplication>,
    pub skipped: Vec<SkippedDepartment>,
}

/// Error raised by the registry. Every variant is recoverable by the caller
/// and carries the offending id and state.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("institution '{0}' not found")]
    InstitutionNotFound(InstitutionId),
    #[error("application '{0}' not found")]
    ApplicationNotFound(ApplicationKey),
    #[error(
        "institute information application already exists for institution \
         '{institution}' as '{application_id}'"
    )]
    AlreadyExists {
        institution: InstitutionId,
        application_id: String,
    },
    #[error("completion percentage {0} is outside the 0-100 range")]
    PercentOutOfRange(u8),
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
    #[error("institution '{institution}' has no ongoing pre-qualifier phase (status '{status}')")]
    PreQualifiersNotOngoing {
        institution: InstitutionId,
        status: InstitutionStatus,
    },
    #[error(
        "institution '{institution}' enters 'sar-ongoing' automatically when its first \
         SAR application is created (status '{status}')"
    )]
    SarStartsWithFirstApplication {
        institution: InstitutionId,
        status: InstitutionStatus,
    },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

static INSTITUTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_institution_id() -> InstitutionId {
    let id = INSTITUTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InstitutionId(format!("inst-{id:06}"))
}

fn next_application_key() -> ApplicationKey {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationKey(format!("sar-{id:06}"))
}

/// Service facade over the record store: onboarding, SAR application
/// creation, progress writes, and status transitions all pass through here
/// so the canonical entity shapes stay the single source of truth.
pub struct AccreditationService<S, L> {
    store: Arc<S>,
    listener: Arc<L>,
    catalog: DepartmentCatalog,
}

impl<S, L> AccreditationService<S, L>
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    pub fn new(store: Arc<S>, listener: Arc<L>) -> Self {
        Self {
            store,
            listener,
            catalog: DepartmentCatalog::standard(),
        }
    }

    /// Register a new institution. Status starts at `registered`;
    /// `registered_date` is stamped here and never changes afterwards.
    pub fn onboard(&self, input: NewInstitution) -> Result<Institution, RegistryError> {
        require(&input.name, "name")?;
        require(&input.institution_code, "institution_code")?;
        require(&input.address, "address")?;
        require(&input.coordinator.name, "coordinator.name")?;
        require(&input.coordinator.email, "coordinator.email")?;
        require(&input.coordinator.phone, "coordinator.phone")?;

        let now = Utc::now();
        let institution = Institution {
            id: next_institution_id(),
            name: input.name,
            institution_code: input.institution_code,
            aishe_code: input.aishe_code,
            category: input.category,
            tier: input.tier,
            email: input.email,
            address: input.address,
            established_year: input.established_year,
            coordinator: input.coordinator,
            nba_coordinator: input.nba_coordinator,
            chairman: input.chairman,
            registered_date: now,
            status: InstitutionStatus::Registered,
            pre_qualifiers_completed: false,
            completion_percentage: None,
            last_updated: now,
        };
        self.store.put_institution(institution.clone())?;
        self.listener.notify(EngineEvent::InstitutionOnboarded {
            institution: institution.id.clone(),
            institution_code: institution.institution_code.clone(),
        })?;
        Ok(institution)
    }

    pub fn institution(&self, id: &InstitutionId) -> Result<Institution, RegistryError> {
        self.store
            .get_institution(id)?
            .ok_or_else(|| RegistryError::InstitutionNotFound(id.clone()))
    }

    pub fn application(&self, key: &ApplicationKey) -> Result<SarApplication, RegistryError> {
        self.store
            .get_application(key)?
            .ok_or_else(|| RegistryError::ApplicationNotFound(key.clone()))
    }

    pub fn applications_for(
        &self,
        id: &InstitutionId,
    ) -> Result<Vec<SarApplication>, RegistryError> {
        self.institution(id)?;
        Ok(self.store.list_applications(id)?)
    }

    /// Create the single institution-wide SAR application.
    pub fn create_institute_info_application(
        &self,
        id: &InstitutionId,
        actor: &str,
    ) -> Result<SarApplication, RegistryError> {
        let mut institution = self.institution(id)?;
        let existing = self.store.list_applications(id)?;
        if let Some(present) = existing.iter().find(|app| app.is_institute_info()) {
            return Err(RegistryError::AlreadyExists {
                institution: id.clone(),
                application_id: present.application_id.clone(),
            });
        }

        let now = Utc::now();
        let application = self.allocate(
            &institution,
            INSTITUTE_INFO,
            "Institute Information",
            "IS",
            actor,
            now,
        );
        self.store.put_application(application.clone())?;
        self.after_first_application(&mut institution, existing.is_empty(), now)?;
        self.listener.notify(EngineEvent::ApplicationCreated {
            institution: id.clone(),
            application_id: application.application_id.clone(),
            department_id: application.department_id.clone(),
        })?;
        Ok(application)
    }

    /// Create one application per requested department. Duplicates and
    /// unknown departments are skipped individually; siblings in the same
    /// batch still proceed.
    pub fn create_applications(
        &self,
        id: &InstitutionId,
        department_ids: &[&str],
        actor: &str,
    ) -> Result<BatchOutcome, RegistryError> {
        let mut institution = self.institution(id)?;
        let existing = self.store.list_applications(id)?;
        let had_applications = !existing.is_empty();
        let mut taken: Vec<SarApplication> = existing;
        let mut outcome = BatchOutcome::default();
        let now = Utc::now();

        for department_id in department_ids {
            let Some(department) = self.catalog.find(institution.category, department_id) else {
                outcome.skipped.push(SkippedDepartment {
                    department_id: (*department_id).to_string(),
                    reason: SkipReason::UnknownDepartment,
                });
                continue;
            };
            if let Some(present) = taken
                .iter()
                .find(|app| app.department_id == department.id)
            {
                outcome.skipped.push(SkippedDepartment {
                    department_id: department.id.to_string(),
                    reason: SkipReason::DuplicateApplication {
                        application_id: present.application_id.clone(),
                    },
                });
                continue;
            }

            let application = self.allocate(
                &institution,
                department.id,
                department.name,
                department.short_code,
                actor,
                now,
            );
            self.store.put_application(application.clone())?;
            self.listener.notify(EngineEvent::ApplicationCreated {
                institution: id.clone(),
                application_id: application.application_id.clone(),
                department_id: application.department_id.clone(),
            })?;
            taken.push(application.clone());
            outcome.created.push(application);
        }

        if !outcome.created.is_empty() {
            self.after_first_application(&mut institution, !had_applications, now)?;
        }
        Ok(outcome)
    }

    /// Catalog departments for the institution's category, minus those that
    /// already have an application. The institute-info singleton is not a
    /// catalog department and never participates in this filter.
    pub fn list_available_departments(
        &self,
        id: &InstitutionId,
    ) -> Result<Vec<Department>, RegistryError> {
        let institution = self.institution(id)?;
        let existing = self.store.list_applications(id)?;
        Ok(self
            .catalog
            .departments_for(institution.category)
            .into_iter()
            .filter(|department| {
                !existing
                    .iter()
                    .any(|app| app.department_id == department.id)
            })
            .copied()
            .collect())
    }

    /// Boundary write used by the external form editor after each saved
    /// field. The percentage is an input fact, not invariant-enforced
    /// monotonic state; a decrease is accepted but logged for data-quality
    /// follow-up.
    pub fn record_application_progress(
        &self,
        key: &ApplicationKey,
        percent: u8,
        actor: &str,
    ) -> Result<SarApplication, RegistryError> {
        if percent > 100 {
            return Err(RegistryError::PercentOutOfRange(percent));
        }
        let mut application = self.application(key)?;
        if percent < application.completion_percentage {
            warn!(
                application_id = %application.application_id,
                previous = application.completion_percentage,
                reported = percent,
                "completion percentage decreased on form editor save"
            );
        }

        let now = Utc::now();
        application.completion_percentage = percent;
        application.status = progress::classify(percent).application_status();
        application.last_modified_date = now;
        application.last_modified_by = actor.to_string();
        self.store.put_application(application.clone())?;

        self.refresh_sar_completion(&application.institution_id, now)?;
        self.listener.notify(EngineEvent::ProgressRecorded {
            institution: application.institution_id.clone(),
            application_id: application.application_id.clone(),
            percent,
        })?;
        Ok(application)
    }

    /// Mark an application as handed in. Completion stays whatever the form
    /// editor last reported.
    pub fn submit_application(
        &self,
        key: &ApplicationKey,
        actor: &str,
    ) -> Result<SarApplication, RegistryError> {
        let mut application = self.application(key)?;
        application.status = ApplicationStatus::Submitted;
        application.last_modified_date = Utc::now();
        application.last_modified_by = actor.to_string();
        self.store.put_application(application.clone())?;
        Ok(application)
    }

    /// Progress write for the pre-qualifier artifacts, meaningful only while
    /// that phase is ongoing.
    pub fn record_pre_qualifier_progress(
        &self,
        id: &InstitutionId,
        percent: u8,
    ) -> Result<Institution, RegistryError> {
        if percent > 100 {
            return Err(RegistryError::PercentOutOfRange(percent));
        }
        let mut institution = self.institution(id)?;
        if institution.status != InstitutionStatus::PreQualifiersOngoing {
            return Err(RegistryError::PreQualifiersNotOngoing {
                institution: id.clone(),
                status: institution.status,
            });
        }
        institution.completion_percentage = Some(percent);
        institution.last_updated = Utc::now();
        self.store.put_institution(institution.clone())?;
        self.listener.notify(EngineEvent::ProgressRecorded {
            institution: id.clone(),
            application_id: "pre-qualifiers".to_string(),
            percent,
        })?;
        Ok(institution)
    }

    /// Operator-driven status transitions. `sar-ongoing` cannot be requested
    /// here; it is entered by the first-application trigger.
    pub fn advance_status(
        &self,
        id: &InstitutionId,
        target: InstitutionStatus,
    ) -> Result<Institution, RegistryError> {
        let mut institution = self.institution(id)?;
        let now = Utc::now();
        match target {
            InstitutionStatus::PreQualifiersOngoing => {
                lifecycle::begin_pre_qualifiers(&mut institution, now)?
            }
            InstitutionStatus::PreQualifiersCompleted => {
                lifecycle::complete_pre_qualifiers(&mut institution, now)?
            }
            InstitutionStatus::SarOngoing => {
                return Err(RegistryError::SarStartsWithFirstApplication {
                    institution: id.clone(),
                    status: institution.status,
                });
            }
            InstitutionStatus::SarCompleted => {
                let applications = self.store.list_applications(id)?;
                let aggregate = progress::institution_progress(&applications);
                lifecycle::complete_sar(&mut institution, aggregate, now)?;
            }
            InstitutionStatus::Registered => {
                return Err(RegistryError::Transition(
                    TransitionError::InvalidTransition {
                        institution: id.clone(),
                        current: institution.status,
                        requested: InstitutionStatus::Registered,
                    },
                ));
            }
        }
        self.store.put_institution(institution.clone())?;
        self.listener.notify(EngineEvent::StatusChanged {
            institution: id.clone(),
            status: institution.status,
        })?;
        Ok(institution)
    }

    pub fn institution_progress(&self, id: &InstitutionId) -> Result<u8, RegistryError> {
        let applications = self.applications_for(id)?;
        Ok(progress::institution_progress(&applications))
    }

    pub fn phase_window(&self, id: &InstitutionId) -> Result<PhaseWindow, RegistryError> {
        let institution = self.institution(id)?;
        Ok(schedule::window_for(&institution))
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats, RegistryError> {
        let institutions = self.store.list_institutions()?;
        Ok(progress::dashboard_stats(&institutions))
    }

    fn allocate(
        &self,
        institution: &Institution,
        department_id: &str,
        department_name: &str,
        suffix: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> SarApplication {
        SarApplication {
            key: next_application_key(),
            application_id: format!(
                "{}-{}-{}",
                institution.institution_code,
                suffix,
                now.format("%Y%m%d")
            ),
            institution_id: institution.id.clone(),
            department_id: department_id.to_string(),
            department_name: department_name.to_string(),
            status: ApplicationStatus::Draft,
            completion_percentage: 0,
            application_start_date: now,
            last_modified_date: now,
            last_modified_by: actor.to_string(),
        }
    }

    /// First-application trigger: a pre-qualifiers-completed institution
    /// enters the SAR phase the moment its first application is created.
    fn after_first_application(
        &self,
        institution: &mut Institution,
        was_first: bool,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        if !was_first || institution.status != InstitutionStatus::PreQualifiersCompleted {
            return Ok(());
        }
        lifecycle::begin_sar(institution, now)?;
        self.store.put_institution(institution.clone())?;
        self.listener.notify(EngineEvent::StatusChanged {
            institution: institution.id.clone(),
            status: institution.status,
        })?;
        Ok(())
    }

    /// While the SAR phase is ongoing the institution mirrors the aggregate
    /// completion of its applications.
    fn refresh_sar_completion(
        &self,
        id: &InstitutionId,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let mut institution = self.institution(id)?;
        if institution.status != InstitutionStatus::SarOngoing {
            return Ok(());
        }
        let applications = self.store.list_applications(id)?;
        institution.completion_percentage = Some(progress::institution_progress(&applications));
        institution.last_updated = now;
        self.store.put_institution(institution)?;
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        return Err(RegistryError::MissingField(field));
    }
    Ok(())
}
