use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use super::domain::{Institution, InstitutionStatus};

const PRE_QUALIFIER_MONTHS: u32 = 3;
const SAR_MONTHS: u32 = 6;

/// Start and end of the phase an institution is currently in (or has most
/// recently completed). Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Derive the phase window from the registration date. Calendar-month
/// addition: day-of-month and year roll over naturally, never fixed 30-day
/// steps. Pure; callers must not write the result back onto the institution.
pub fn window_for(institution: &Institution) -> PhaseWindow {
    let registered = institution.registered_date;
    match institution.status {
        InstitutionStatus::PreQualifiersOngoing | InstitutionStatus::PreQualifiersCompleted => {
            PhaseWindow {
                start_date: registered,
                end_date: registered + Months::new(PRE_QUALIFIER_MONTHS),
            }
        }
        InstitutionStatus::SarOngoing | InstitutionStatus::SarCompleted => {
            let start = registered + Months::new(PRE_QUALIFIER_MONTHS);
            PhaseWindow {
                start_date: start,
                end_date: start + Months::new(SAR_MONTHS),
            }
        }
        InstitutionStatus::Registered => PhaseWindow {
            start_date: registered,
            end_date: registered,
        },
    }
}
