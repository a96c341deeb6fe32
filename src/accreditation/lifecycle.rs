use chrono::{DateTime, Utc};

use super::domain::{Institution, InstitutionId, InstitutionStatus};

/// Rejected state change. The record is left untouched; callers surface the
/// current status to the operator instead of absorbing the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error(
        "institution '{institution}' cannot move from '{current}' to '{requested}': \
         transitions only advance one step at a time"
    )]
    InvalidTransition {
        institution: InstitutionId,
        current: InstitutionStatus,
        requested: InstitutionStatus,
    },
    #[error(
        "institution '{institution}' cannot complete '{current}' at {percent}% \
         completion: 100% is required"
    )]
    IncompleteProgress {
        institution: InstitutionId,
        current: InstitutionStatus,
        percent: u8,
    },
}

fn ensure_next(
    institution: &Institution,
    requested: InstitutionStatus,
) -> Result<(), TransitionError> {
    if institution.status.successor() == Some(requested) {
        return Ok(());
    }
    Err(TransitionError::InvalidTransition {
        institution: institution.id.clone(),
        current: institution.status,
        requested,
    })
}

/// Operator action: the institution starts working on pre-qualifier criteria.
/// Allowed at any time after registration.
pub fn begin_pre_qualifiers(
    institution: &mut Institution,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    ensure_next(institution, InstitutionStatus::PreQualifiersOngoing)?;
    institution.status = InstitutionStatus::PreQualifiersOngoing;
    institution.completion_percentage = Some(0);
    institution.last_updated = now;
    Ok(())
}

/// Operator action: pre-qualifier artifacts are done. Requires 100%
/// completion; clears the percentage since it carries no meaning outside an
/// ongoing phase.
pub fn complete_pre_qualifiers(
    institution: &mut Institution,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    ensure_next(institution, InstitutionStatus::PreQualifiersCompleted)?;
    let percent = institution.completion_percentage.unwrap_or(0);
    if percent != 100 {
        return Err(TransitionError::IncompleteProgress {
            institution: institution.id.clone(),
            current: institution.status,
            percent,
        });
    }
    institution.status = InstitutionStatus::PreQualifiersCompleted;
    institution.pre_qualifiers_completed = true;
    institution.completion_percentage = None;
    institution.last_updated = now;
    Ok(())
}

/// Registry trigger: fired when the first SAR application is created for a
/// pre-qualifiers-completed institution. This is the one transition the
/// engine performs on its own initiative; it is never an operator action.
pub fn begin_sar(institution: &mut Institution, now: DateTime<Utc>) -> Result<(), TransitionError> {
    ensure_next(institution, InstitutionStatus::SarOngoing)?;
    institution.status = InstitutionStatus::SarOngoing;
    institution.completion_percentage = Some(0);
    institution.last_updated = now;
    Ok(())
}

/// Operator action: closes the SAR phase. `aggregate_percent` is the mean
/// completion across every SAR application of the institution and must be
/// 100.
pub fn complete_sar(
    institution: &mut Institution,
    aggregate_percent: u8,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    ensure_next(institution, InstitutionStatus::SarCompleted)?;
    if aggregate_percent != 100 {
        return Err(TransitionError::IncompleteProgress {
            institution: institution.id.clone(),
            current: institution.status,
            percent: aggregate_percent,
        });
    }
    institution.status = InstitutionStatus::SarCompleted;
    institution.completion_percentage = None;
    institution.last_updated = now;
    Ok(())
}
