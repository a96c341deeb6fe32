use chrono::Utc;

use super::common::{build_service, finish_pre_qualifiers, new_institution};
use crate::accreditation::domain::{ApplicationStatus, InstitutionStatus, INSTITUTE_INFO};
use crate::accreditation::registry::{RegistryError, SkipReason};
use crate::accreditation::store::EngineEvent;

#[test]
fn onboarding_creates_a_registered_institution() {
    let (service, _, listener) = build_service();
    let institution = service
        .onboard(new_institution("RGUKT"))
        .expect("onboarding succeeds");

    assert_eq!(institution.status, InstitutionStatus::Registered);
    assert!(!institution.pre_qualifiers_completed);
    assert_eq!(institution.completion_percentage, None);
    assert_eq!(institution.registered_date, institution.last_updated);
    assert!(matches!(
        listener.events().first(),
        Some(EngineEvent::InstitutionOnboarded { .. })
    ));
}

#[test]
fn onboarding_rejects_blank_required_fields() {
    let (service, _, _) = build_service();
    let mut input = new_institution("RGUKT");
    input.coordinator.email = "   ".to_string();

    match service.onboard(input) {
        Err(RegistryError::MissingField(field)) => assert_eq!(field, "coordinator.email"),
        other => panic!("expected missing field error, got {other:?}"),
    }
}

#[test]
fn institute_info_application_is_a_singleton() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    let application = service
        .create_institute_info_application(&institution.id, "rao@rgukt.ac.in")
        .expect("first creation succeeds");
    assert_eq!(application.department_id, INSTITUTE_INFO);
    assert_eq!(application.status, ApplicationStatus::Draft);
    assert_eq!(application.completion_percentage, 0);
    let expected_id = format!("RGUKT-IS-{}", Utc::now().format("%Y%m%d"));
    assert_eq!(application.application_id, expected_id);

    match service.create_institute_info_application(&institution.id, "rao@rgukt.ac.in") {
        Err(RegistryError::AlreadyExists { application_id, .. }) => {
            assert_eq!(application_id, application.application_id);
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

#[test]
fn batch_create_returns_distinct_applications() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    let outcome = service
        .create_applications(&institution.id, &["cse", "ece"], "a@b.com")
        .expect("batch create succeeds");
    assert_eq!(outcome.created.len(), 2);
    assert!(outcome.skipped.is_empty());
    assert_ne!(
        outcome.created[0].application_id,
        outcome.created[1].application_id
    );
    assert_eq!(outcome.created[0].department_name, "Computer Science Engineering");
}

#[test]
fn duplicates_are_skipped_while_siblings_proceed() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);
    service
        .create_applications(&institution.id, &["cse", "ece"], "a@b.com")
        .expect("seed applications");

    let outcome = service
        .create_applications(&institution.id, &["cse", "mech"], "a@b.com")
        .expect("batch with duplicate still succeeds");
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].department_id, "mech");
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].department_id, "cse");
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::DuplicateApplication { .. }
    ));
}

#[test]
fn unknown_departments_are_reported_per_request() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    let outcome = service
        .create_applications(&institution.id, &["aeronautics", "civil"], "a@b.com")
        .expect("batch succeeds");
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].department_id, "civil");
    assert_eq!(
        outcome.skipped,
        vec![crate::accreditation::registry::SkippedDepartment {
            department_id: "aeronautics".to_string(),
            reason: SkipReason::UnknownDepartment,
        }]
    );
}

#[test]
fn first_application_moves_institution_into_sar_phase() {
    let (service, _, listener) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("create institute-info");

    let refreshed = service.institution(&institution.id).expect("lookup");
    assert_eq!(refreshed.status, InstitutionStatus::SarOngoing);
    assert_eq!(refreshed.completion_percentage, Some(0));
    assert!(listener.events().iter().any(|event| matches!(
        event,
        EngineEvent::StatusChanged {
            status: InstitutionStatus::SarOngoing,
            ..
        }
    )));
}

#[test]
fn later_applications_do_not_retrigger_the_sar_transition() {
    let (service, _, listener) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("first application");
    service
        .create_applications(&institution.id, &["cse"], "a@b.com")
        .expect("second application");

    let transitions = listener
        .events()
        .iter()
        .filter(|event| {
            matches!(
                event,
                EngineEvent::StatusChanged {
                    status: InstitutionStatus::SarOngoing,
                    ..
                }
            )
        })
        .count();
    assert_eq!(transitions, 1);
}

#[test]
fn sar_ongoing_cannot_be_requested_by_an_operator() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    match service.advance_status(&institution.id, InstitutionStatus::SarOngoing) {
        Err(RegistryError::SarStartsWithFirstApplication { status, .. }) => {
            assert_eq!(status, InstitutionStatus::PreQualifiersCompleted);
        }
        other => panic!("expected SarStartsWithFirstApplication, got {other:?}"),
    }
}

#[test]
fn available_departments_shrink_as_applications_are_created() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    assert_eq!(
        service
            .list_available_departments(&institution.id)
            .expect("catalog list")
            .len(),
        8
    );

    service
        .create_applications(&institution.id, &["cse", "ece"], "a@b.com")
        .expect("create applications");
    service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("institute-info does not consume a catalog slot");

    let available = service
        .list_available_departments(&institution.id)
        .expect("catalog list");
    assert_eq!(available.len(), 6);
    assert!(available.iter().all(|dept| dept.id != "cse" && dept.id != "ece"));
}

#[test]
fn progress_writes_update_application_and_institution() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);
    let application = service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("create institute-info");

    let updated = service
        .record_application_progress(&application.key, 40, "editor@rgukt.ac.in")
        .expect("progress recorded");
    assert_eq!(updated.completion_percentage, 40);
    assert_eq!(updated.status, ApplicationStatus::InProgress);
    assert_eq!(updated.last_modified_by, "editor@rgukt.ac.in");

    let refreshed = service.institution(&institution.id).expect("lookup");
    assert_eq!(refreshed.completion_percentage, Some(40));
}

#[test]
fn decreasing_progress_is_accepted_as_reported() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);
    let application = service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("create institute-info");

    service
        .record_application_progress(&application.key, 60, "a@b.com")
        .expect("raise");
    let lowered = service
        .record_application_progress(&application.key, 20, "a@b.com")
        .expect("a cleared field can lower the percentage");
    assert_eq!(lowered.completion_percentage, 20);
}

#[test]
fn progress_outside_the_range_is_rejected() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);
    let application = service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("create institute-info");

    assert!(matches!(
        service.record_application_progress(&application.key, 101, "a@b.com"),
        Err(RegistryError::PercentOutOfRange(101))
    ));
}

#[test]
fn sar_completion_is_gated_on_the_aggregate() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);

    let info = service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("institute-info");
    let outcome = service
        .create_applications(&institution.id, &["cse", "ece"], "a@b.com")
        .expect("departments");

    service
        .record_application_progress(&info.key, 100, "a@b.com")
        .expect("progress");
    service
        .record_application_progress(&outcome.created[0].key, 100, "a@b.com")
        .expect("progress");
    service
        .record_application_progress(&outcome.created[1].key, 50, "a@b.com")
        .expect("progress");

    assert_eq!(
        service
            .institution_progress(&institution.id)
            .expect("aggregate"),
        83
    );
    assert!(matches!(
        service.advance_status(&institution.id, InstitutionStatus::SarCompleted),
        Err(RegistryError::Transition(_))
    ));

    service
        .record_application_progress(&outcome.created[1].key, 100, "a@b.com")
        .expect("progress");
    let completed = service
        .advance_status(&institution.id, InstitutionStatus::SarCompleted)
        .expect("aggregate at 100");
    assert_eq!(completed.status, InstitutionStatus::SarCompleted);
    assert_eq!(completed.completion_percentage, None);
}

#[test]
fn pre_qualifier_progress_requires_the_ongoing_phase() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");

    match service.record_pre_qualifier_progress(&institution.id, 50) {
        Err(RegistryError::PreQualifiersNotOngoing { status, .. }) => {
            assert_eq!(status, InstitutionStatus::Registered);
        }
        other => panic!("expected PreQualifiersNotOngoing, got {other:?}"),
    }
}

#[test]
fn submitted_applications_keep_their_completion() {
    let (service, _, _) = build_service();
    let institution = service.onboard(new_institution("RGUKT")).expect("onboard");
    finish_pre_qualifiers(&service, &institution.id);
    let application = service
        .create_institute_info_application(&institution.id, "a@b.com")
        .expect("create");

    service
        .record_application_progress(&application.key, 100, "a@b.com")
        .expect("progress");
    let submitted = service
        .submit_application(&application.key, "a@b.com")
        .expect("submit");
    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert_eq!(submitted.completion_percentage, 100);
}

#[test]
fn lookups_for_unknown_records_propagate_not_found() {
    let (service, _, _) = build_service();
    let missing = crate::accreditation::InstitutionId("inst-999999".to_string());
    assert!(matches!(
        service.institution(&missing),
        Err(RegistryError::InstitutionNotFound(_))
    ));
    let missing_app = crate::accreditation::ApplicationKey("sar-999999".to_string());
    assert!(matches!(
        service.application(&missing_app),
        Err(RegistryError::ApplicationNotFound(_))
    ));
}
