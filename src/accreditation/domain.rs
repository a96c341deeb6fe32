use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel department id for the single institution-wide SAR application.
pub const INSTITUTE_INFO: &str = "institute-info";

/// Opaque, stable identifier for an institution record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstitutionId(pub String);

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal key for a SAR application record. The externally visible
/// `application_id` string is derived separately at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationKey(pub String);

impl fmt::Display for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category an institution registered under; determines which departments are
/// eligible for SAR applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstitutionCategory {
    Engineering,
    Mba,
    Medical,
    ArtsAndScience,
    Pharmacy,
    Architecture,
    Mca,
    HospitalityAndTourism,
}

impl InstitutionCategory {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Engineering,
            Self::Mba,
            Self::Medical,
            Self::ArtsAndScience,
            Self::Pharmacy,
            Self::Architecture,
            Self::Mca,
            Self::HospitalityAndTourism,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Mba => "MBA",
            Self::Medical => "Medical",
            Self::ArtsAndScience => "Arts & Science",
            Self::Pharmacy => "Pharmacy",
            Self::Architecture => "Architecture",
            Self::Mca => "MCA",
            Self::HospitalityAndTourism => "Hospitality & Tourism Management",
        }
    }

    /// Parse the display label used by onboarding forms and roster exports.
    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for InstitutionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierCategory {
    #[serde(rename = "tier-1")]
    TierI,
    #[serde(rename = "tier-2")]
    TierII,
    #[serde(rename = "tier-3")]
    TierIII,
}

impl TierCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TierI => "Tier I",
            Self::TierII => "Tier II",
            Self::TierIII => "Tier III",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Tier I" | "Tier 1" => Some(Self::TierI),
            "Tier II" | "Tier 2" => Some(Self::TierII),
            "Tier III" | "Tier 3" => Some(Self::TierIII),
            _ => None,
        }
    }
}

/// Institution lifecycle status. The five values are the full vocabulary
/// exposed to consumers; transitions between them are owned by
/// [`crate::accreditation::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstitutionStatus {
    Registered,
    PreQualifiersOngoing,
    PreQualifiersCompleted,
    SarOngoing,
    SarCompleted,
}

impl InstitutionStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Registered,
            Self::PreQualifiersOngoing,
            Self::PreQualifiersCompleted,
            Self::SarOngoing,
            Self::SarCompleted,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::PreQualifiersOngoing => "pre-qualifiers-ongoing",
            Self::PreQualifiersCompleted => "pre-qualifiers-completed",
            Self::SarOngoing => "sar-ongoing",
            Self::SarCompleted => "sar-completed",
        }
    }

    /// The only legal next step, or `None` for the terminal status.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::PreQualifiersOngoing),
            Self::PreQualifiersOngoing => Some(Self::PreQualifiersCompleted),
            Self::PreQualifiersCompleted => Some(Self::SarOngoing),
            Self::SarOngoing => Some(Self::SarCompleted),
            Self::SarCompleted => None,
        }
    }

    /// A phase is ongoing while completion percentage carries meaning.
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::PreQualifiersOngoing | Self::SarOngoing)
    }
}

impl fmt::Display for InstitutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a single SAR application, reported by the external form editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Draft,
    InProgress,
    Submitted,
    Completed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in-progress",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
        }
    }
}

/// Primary contact captured during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Named contact with designation, used for the NBA coordinator and chairman.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPerson {
    pub name: String,
    pub designation: String,
    pub email: String,
    pub contact_number: String,
}

/// Canonical institution record. There is exactly one shape for this entity;
/// `status` is mutated only through the lifecycle module and
/// `completion_percentage` only through the registry's progress writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub institution_code: String,
    pub aishe_code: Option<String>,
    pub category: InstitutionCategory,
    pub tier: Option<TierCategory>,
    pub email: Option<String>,
    pub address: String,
    pub established_year: Option<u16>,
    pub coordinator: Coordinator,
    pub nba_coordinator: Option<ContactPerson>,
    pub chairman: Option<ContactPerson>,
    pub registered_date: DateTime<Utc>,
    pub status: InstitutionStatus,
    pub pre_qualifiers_completed: bool,
    /// Present only while a phase is ongoing; cleared on phase completion.
    pub completion_percentage: Option<u8>,
    pub last_updated: DateTime<Utc>,
}

/// Department eligible for a SAR application. Immutable, sourced from
/// [`crate::accreditation::catalog`]; never created or destroyed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Department {
    pub id: &'static str,
    pub name: &'static str,
    /// Short code used in the application id suffix, e.g. `CSE`.
    pub short_code: &'static str,
    pub category: InstitutionCategory,
}

/// One SAR application: either the institute-info singleton or a department
/// application. At most one exists per `(institution, department)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarApplication {
    pub key: ApplicationKey,
    /// Externally visible id, `{institutionCode}-{suffix}-{YYYYMMDD}`.
    pub application_id: String,
    pub institution_id: InstitutionId,
    pub department_id: String,
    pub department_name: String,
    pub status: ApplicationStatus,
    pub completion_percentage: u8,
    pub application_start_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub last_modified_by: String,
}

impl SarApplication {
    pub fn is_institute_info(&self) -> bool {
        self.department_id == INSTITUTE_INFO
    }
}

/// Counts of institutions by status, recomputed on demand and never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_registered: usize,
    pub pre_qualifiers_ongoing: usize,
    pub pre_qualifiers_completed: usize,
    pub sar_ongoing: usize,
    pub sar_completed: usize,
}
