use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    ApplicationKey, Department, Institution, InstitutionId, InstitutionStatus,
};
use super::registry::{AccreditationService, NewInstitution, RegistryError};
use super::schedule::PhaseWindow;
use super::store::{EventListener, RecordStore};

/// Router builder exposing the engine as a JSON API for the admin and
/// institute dashboards.
pub fn accreditation_router<S, L>(service: Arc<AccreditationService<S, L>>) -> Router
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    Router::new()
        .route("/api/v1/institutions", post(onboard_handler::<S, L>))
        .route(
            "/api/v1/institutions/:institution_id",
            get(snapshot_handler::<S, L>),
        )
        .route(
            "/api/v1/institutions/:institution_id/departments",
            get(departments_handler::<S, L>),
        )
        .route(
            "/api/v1/institutions/:institution_id/applications",
            post(create_applications_handler::<S, L>),
        )
        .route(
            "/api/v1/institutions/:institution_id/applications/institute-info",
            post(institute_info_handler::<S, L>),
        )
        .route(
            "/api/v1/institutions/:institution_id/status",
            post(advance_status_handler::<S, L>),
        )
        .route(
            "/api/v1/applications/:key/progress",
            post(progress_handler::<S, L>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S, L>))
        .with_state(service)
}

/// Institution record plus everything the dashboards derive from it.
#[derive(Debug, Serialize)]
struct InstitutionSnapshot {
    #[serde(flatten)]
    institution: Institution,
    phase_window: PhaseWindow,
    sar_progress: u8,
}

#[derive(Debug, Deserialize)]
struct ActorRequest {
    actor: String,
}

#[derive(Debug, Deserialize)]
struct CreateApplicationsRequest {
    departments: Vec<String>,
    actor: String,
}

#[derive(Debug, Deserialize)]
struct AdvanceStatusRequest {
    target: InstitutionStatus,
}

#[derive(Debug, Deserialize)]
struct ProgressRequest {
    percentage: u8,
    actor: String,
}

#[derive(Debug, Serialize)]
struct AvailableDepartmentsResponse {
    departments: Vec<Department>,
}

async fn onboard_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    axum::Json(input): axum::Json<NewInstitution>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    match service.onboard(input) {
        Ok(institution) => (StatusCode::CREATED, axum::Json(institution)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn snapshot_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(institution_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let id = InstitutionId(institution_id);
    let snapshot = service.institution(&id).and_then(|institution| {
        let phase_window = service.phase_window(&id)?;
        let sar_progress = service.institution_progress(&id)?;
        Ok(InstitutionSnapshot {
            institution,
            phase_window,
            sar_progress,
        })
    });
    match snapshot {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn departments_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(institution_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let id = InstitutionId(institution_id);
    match service.list_available_departments(&id) {
        Ok(departments) => (
            StatusCode::OK,
            axum::Json(AvailableDepartmentsResponse { departments }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_applications_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(institution_id): Path<String>,
    axum::Json(request): axum::Json<CreateApplicationsRequest>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let id = InstitutionId(institution_id);
    let departments: Vec<&str> = request.departments.iter().map(String::as_str).collect();
    match service.create_applications(&id, &departments, &request.actor) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn institute_info_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(institution_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let id = InstitutionId(institution_id);
    match service.create_institute_info_application(&id, &request.actor) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn advance_status_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(institution_id): Path<String>,
    axum::Json(request): axum::Json<AdvanceStatusRequest>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let id = InstitutionId(institution_id);
    match service.advance_status(&id, request.target) {
        Ok(institution) => (StatusCode::OK, axum::Json(institution)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn progress_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
    Path(key): Path<String>,
    axum::Json(request): axum::Json<ProgressRequest>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    let key = ApplicationKey(key);
    match service.record_application_progress(&key, request.percentage, &request.actor) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn dashboard_handler<S, L>(
    State(service): State<Arc<AccreditationService<S, L>>>,
) -> Response
where
    S: RecordStore + 'static,
    L: EventListener + 'static,
{
    match service.dashboard_stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RegistryError) -> Response {
    let status = match &err {
        RegistryError::InstitutionNotFound(_) | RegistryError::ApplicationNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RegistryError::AlreadyExists { .. } => StatusCode::CONFLICT,
        RegistryError::PercentOutOfRange(_)
        | RegistryError::MissingField(_)
        | RegistryError::PreQualifiersNotOngoing { .. }
        | RegistryError::SarStartsWithFirstApplication { .. }
        | RegistryError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::Store(_) | RegistryError::Listener(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
