use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::accreditation::domain::{InstitutionCategory, TierCategory};

#[derive(Debug)]
pub(crate) struct RosterRecord {
    pub(crate) line: u64,
    pub(crate) name: String,
    pub(crate) institution_code: String,
    pub(crate) aishe_code: Option<String>,
    pub(crate) category: Option<InstitutionCategory>,
    pub(crate) category_label: String,
    pub(crate) tier: Option<TierCategory>,
    pub(crate) email: Option<String>,
    pub(crate) address: String,
    pub(crate) established_year: Option<u16>,
    pub(crate) coordinator_name: String,
    pub(crate) coordinator_email: String,
    pub(crate) coordinator_phone: String,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        records.push(RosterRecord {
            // Header occupies line 1; data rows start at 2.
            line: index as u64 + 2,
            name: row.name,
            institution_code: row.institution_code,
            aishe_code: row.aishe_code,
            category: InstitutionCategory::parse_label(&row.category),
            category_label: row.category,
            tier: row.tier.as_deref().and_then(TierCategory::parse_label),
            email: row.email,
            address: row.address,
            established_year: row.established_year,
            coordinator_name: row.coordinator_name,
            coordinator_email: row.coordinator_email,
            coordinator_phone: row.coordinator_phone,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Institution Name")]
    name: String,
    #[serde(rename = "Institution Code")]
    institution_code: String,
    #[serde(rename = "AISHE Code", default, deserialize_with = "empty_string_as_none")]
    aishe_code: Option<String>,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Tier", default, deserialize_with = "empty_string_as_none")]
    tier: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Established Year", default)]
    established_year: Option<u16>,
    #[serde(rename = "Coordinator Name", default)]
    coordinator_name: String,
    #[serde(rename = "Coordinator Email", default)]
    coordinator_email: String,
    #[serde(rename = "Coordinator Phone", default)]
    coordinator_phone: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
