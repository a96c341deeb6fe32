//! Bulk onboarding from an administrative roster export.

use std::sync::Arc;

use accred_engine::accreditation::{
    AccreditationService, InstitutionStatus, LogListener, MemoryStore, RosterImporter,
};

const ROSTER: &str = "\
Institution Name,Institution Code,AISHE Code,Category,Tier,Email,Address,Established Year,Coordinator Name,Coordinator Email,Coordinator Phone
RGUKT Basar,RGUKT,U-0417,Engineering,Tier II,office@rgukt.ac.in,Basar,2008,A. Rao,rao@rgukt.ac.in,9999999999
Sunrise Business School,SBS,,MBA,,,Hyderabad,2001,K. Iyer,iyer@sbs.edu,8888888888
Unknown College,UNK,,Culinary,,,Somewhere,,B. Lee,lee@unk.edu,7777777777
Broken Row,BRK,,Engineering,,,Nowhere,,,b@broken.edu,6666666666
";

fn build_service() -> AccreditationService<MemoryStore, LogListener> {
    AccreditationService::new(Arc::new(MemoryStore::default()), Arc::new(LogListener))
}

#[test]
fn valid_rows_are_onboarded_and_bad_rows_reported() {
    let service = build_service();
    let summary =
        RosterImporter::from_reader(ROSTER.as_bytes(), &service).expect("roster import runs");

    assert_eq!(summary.onboarded.len(), 2);
    assert!(summary
        .onboarded
        .iter()
        .all(|institution| institution.status == InstitutionStatus::Registered));

    assert_eq!(summary.skipped.len(), 2);
    let unknown = &summary.skipped[0];
    assert_eq!(unknown.institution_code, "UNK");
    assert!(unknown.reason.contains("Culinary"));
    let broken = &summary.skipped[1];
    assert_eq!(broken.institution_code, "BRK");
    assert!(broken.reason.contains("coordinator.name"));
}

#[test]
fn imported_institutions_show_up_on_the_dashboard() {
    let service = build_service();
    RosterImporter::from_reader(ROSTER.as_bytes(), &service).expect("roster import runs");

    let stats = service.dashboard_stats().expect("stats");
    assert_eq!(stats.total_registered, 2);
    assert_eq!(stats.pre_qualifiers_ongoing, 0);
}

#[test]
fn malformed_csv_fails_the_import() {
    let service = build_service();
    let bad = "Institution Name,Institution Code\n\"unterminated";
    assert!(RosterImporter::from_reader(bad.as_bytes(), &service).is_err());
}
