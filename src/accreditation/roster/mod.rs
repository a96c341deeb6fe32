//! Bulk onboarding from an administrative roster export (CSV, one row per
//! institution). Rows that cannot be onboarded are reported individually;
//! the rest of the file still goes through.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::domain::{Coordinator, Institution};
use super::registry::{AccreditationService, NewInstitution, RegistryError};
use super::store::{EventListener, RecordStore};

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One roster row the importer refused, with its CSV line number.
#[derive(Debug, Serialize)]
pub struct RosterSkip {
    pub line: u64,
    pub institution_code: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RosterImportSummary {
    pub onboarded: Vec<Institution>,
    pub skipped: Vec<RosterSkip>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<S, L, P: AsRef<Path>>(
        path: P,
        service: &AccreditationService<S, L>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        S: RecordStore + 'static,
        L: EventListener + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    pub fn from_reader<S, L, R: Read>(
        reader: R,
        service: &AccreditationService<S, L>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        S: RecordStore + 'static,
        L: EventListener + 'static,
    {
        let mut summary = RosterImportSummary::default();

        for record in parser::parse_records(reader)? {
            let Some(category) = record.category else {
                summary.skipped.push(RosterSkip {
                    line: record.line,
                    institution_code: record.institution_code,
                    reason: format!("unknown institution category '{}'", record.category_label),
                });
                continue;
            };

            let input = NewInstitution {
                name: record.name,
                institution_code: record.institution_code.clone(),
                aishe_code: record.aishe_code,
                category,
                tier: record.tier,
                email: record.email,
                address: record.address,
                established_year: record.established_year,
                coordinator: Coordinator {
                    name: record.coordinator_name,
                    email: record.coordinator_email,
                    phone: record.coordinator_phone,
                },
                nba_coordinator: None,
                chairman: None,
            };

            match service.onboard(input) {
                Ok(institution) => summary.onboarded.push(institution),
                Err(err @ RegistryError::MissingField(_)) => {
                    summary.skipped.push(RosterSkip {
                        line: record.line,
                        institution_code: record.institution_code,
                        reason: err.to_string(),
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(summary)
    }
}
