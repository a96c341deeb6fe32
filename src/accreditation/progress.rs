use serde::Serialize;

use super::domain::{ApplicationStatus, DashboardStats, Institution, InstitutionStatus, SarApplication};

/// Where a 0-100 completion percentage sits. Used uniformly by the state
/// machine's completion checks and by display logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionBand {
    Draft,
    InProgress,
    Completed,
}

impl CompletionBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// The application status a form-editor save at this band maps to.
    pub const fn application_status(self) -> ApplicationStatus {
        match self {
            Self::Draft => ApplicationStatus::Draft,
            Self::InProgress => ApplicationStatus::InProgress,
            Self::Completed => ApplicationStatus::Completed,
        }
    }
}

pub const fn classify(percent: u8) -> CompletionBand {
    match percent {
        0 => CompletionBand::Draft,
        100 => CompletionBand::Completed,
        _ => CompletionBand::InProgress,
    }
}

/// Arithmetic mean of completion across all of an institution's SAR
/// applications (institute-info counted once, each department once), rounded
/// to the nearest integer. Zero when no applications exist yet.
pub fn institution_progress(applications: &[SarApplication]) -> u8 {
    if applications.is_empty() {
        return 0;
    }
    let total: u32 = applications
        .iter()
        .map(|application| u32::from(application.completion_percentage))
        .sum();
    let mean = f64::from(total) / applications.len() as f64;
    mean.round() as u8
}

/// Single pass over the institution collection. `total_registered` counts
/// every institution regardless of status.
pub fn dashboard_stats(institutions: &[Institution]) -> DashboardStats {
    let mut stats = DashboardStats::default();
    for institution in institutions {
        stats.total_registered += 1;
        match institution.status {
            InstitutionStatus::Registered => {}
            InstitutionStatus::PreQualifiersOngoing => stats.pre_qualifiers_ongoing += 1,
            InstitutionStatus::PreQualifiersCompleted => stats.pre_qualifiers_completed += 1,
            InstitutionStatus::SarOngoing => stats.sar_ongoing += 1,
            InstitutionStatus::SarCompleted => stats.sar_completed += 1,
        }
    }
    stats
}
