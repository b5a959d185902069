use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Candidature, CandidatureId, Convocation, ConvocationId, CvId, EmployeurId, EntenteId,
    EntenteStage, Evaluation, EvaluationKind, OfferId, ProfesseurId,
};
use super::directory::EntenteView;
use super::error::PlacementError;
use super::identity::{Actor, Role};
use super::service::InternshipPlacement;

/// Trusted caller identity headers set by the upstream auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

type PlacementState = State<Arc<InternshipPlacement>>;

/// Router builder exposing the candidature, entente, and directory endpoints.
pub fn placement_router(placement: Arc<InternshipPlacement>) -> Router {
    Router::new()
        .route(
            "/api/v1/candidatures",
            post(apply_handler).get(list_candidatures_handler),
        )
        .route(
            "/api/v1/candidatures/:candidature_id/accept",
            post(accept_handler),
        )
        .route(
            "/api/v1/candidatures/:candidature_id/reject",
            post(reject_handler),
        )
        .route(
            "/api/v1/candidatures/:candidature_id/convocation",
            post(convoke_handler),
        )
        .route(
            "/api/v1/offers/:offer_id/candidatures",
            get(offer_candidatures_handler),
        )
        .route("/api/v1/convocations", get(list_convocations_handler))
        .route(
            "/api/v1/convocations/:convocation_id/response",
            post(convocation_response_handler),
        )
        .route(
            "/api/v1/ententes",
            post(create_entente_handler).get(list_ententes_handler),
        )
        .route("/api/v1/ententes/:entente_id", get(entente_handler))
        .route("/api/v1/ententes/:entente_id/missions", put(missions_handler))
        .route(
            "/api/v1/ententes/:entente_id/professeur",
            post(assign_professeur_handler),
        )
        .route(
            "/api/v1/ententes/:entente_id/submit",
            post(request_signatures_handler),
        )
        .route("/api/v1/ententes/:entente_id/sign", post(sign_handler))
        .route(
            "/api/v1/ententes/:entente_id/evaluations",
            post(submit_evaluation_handler).get(list_evaluations_handler),
        )
        .with_state(placement)
}

/// Error surfaced by the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    Unauthenticated(&'static str),
    Placement(PlacementError),
}

impl From<PlacementError> for ApiError {
    fn from(value: PlacementError) -> Self {
        Self::Placement(value)
    }
}

pub fn status_for(error: &PlacementError) -> StatusCode {
    match error {
        PlacementError::NotFound(_) => StatusCode::NOT_FOUND,
        PlacementError::Ownership(_) => StatusCode::FORBIDDEN,
        PlacementError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementError::InvalidState(_)
        | PlacementError::Conflict(_)
        | PlacementError::StaleState(_) => StatusCode::CONFLICT,
        PlacementError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Unauthenticated(message) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", message.to_string())
            }
            ApiError::Placement(PlacementError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal error".to_string(),
            ),
            ApiError::Placement(error) => (status_for(&error), error.kind(), error.to_string()),
        };

        let body = Json(json!({ "error": message, "kind": kind }));
        (status, body).into_response()
    }
}

pub(crate) fn caller(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or(ApiError::Unauthenticated("missing or invalid x-user-id header"))?;
    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Role::parse)
        .ok_or(ApiError::Unauthenticated("missing or invalid x-user-role header"))?;
    Ok(Actor { id, role })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) offer_id: OfferId,
    pub(crate) cv_id: CvId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateEntenteRequest {
    pub(crate) candidature_id: CandidatureId,
    pub(crate) missions_objectifs: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MissionsRequest {
    pub(crate) missions_objectifs: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignProfesseurRequest {
    pub(crate) professeur_id: ProfesseurId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConvocationRequest {
    pub(crate) scheduled_at: DateTime<Utc>,
    pub(crate) location: String,
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConvocationResponseRequest {
    pub(crate) accept: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    pub(crate) kind: EvaluationKind,
    pub(crate) score: u8,
    #[serde(default)]
    pub(crate) comments: String,
}

pub(crate) async fn apply_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Candidature>), ApiError> {
    let student_id = caller(&headers)?.as_student()?;
    let record = placement
        .candidatures
        .apply(student_id, request.offer_id, request.cv_id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn list_candidatures_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
) -> Result<Json<Vec<Candidature>>, ApiError> {
    let actor = caller(&headers)?;
    Ok(Json(placement.directory.candidatures_for(&actor)?))
}

pub(crate) async fn accept_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(candidature_id): Path<u64>,
) -> Result<Json<Candidature>, ApiError> {
    let actor = caller(&headers)?;
    let id = CandidatureId(candidature_id);
    let record = match actor.role {
        Role::Employeur => placement
            .candidatures
            .accept_by_employeur(id, EmployeurId(actor.id))?,
        _ => placement
            .candidatures
            .accept_by_student(id, actor.as_student()?)?,
    };
    Ok(Json(record))
}

pub(crate) async fn reject_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(candidature_id): Path<u64>,
) -> Result<Json<Candidature>, ApiError> {
    let actor = caller(&headers)?;
    let id = CandidatureId(candidature_id);
    let record = match actor.role {
        Role::Employeur => placement
            .candidatures
            .reject_by_employeur(id, EmployeurId(actor.id))?,
        _ => placement
            .candidatures
            .reject_by_student(id, actor.as_student()?)?,
    };
    Ok(Json(record))
}

pub(crate) async fn offer_candidatures_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(offer_id): Path<u64>,
) -> Result<Json<Vec<Candidature>>, ApiError> {
    let employeur_id = caller(&headers)?.as_employeur()?;
    let records = placement
        .directory
        .candidatures_by_offer(OfferId(offer_id), employeur_id)?;
    Ok(Json(records))
}

pub(crate) async fn convoke_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(candidature_id): Path<u64>,
    Json(request): Json<ConvocationRequest>,
) -> Result<(StatusCode, Json<Convocation>), ApiError> {
    let employeur_id = caller(&headers)?.as_employeur()?;
    let record = placement.convocations.convoke(
        CandidatureId(candidature_id),
        employeur_id,
        request.scheduled_at,
        &request.location,
        &request.message,
    )?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn list_convocations_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
) -> Result<Json<Vec<Convocation>>, ApiError> {
    let actor = caller(&headers)?;
    Ok(Json(placement.directory.convocations_for(&actor)?))
}

pub(crate) async fn convocation_response_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(convocation_id): Path<u64>,
    Json(request): Json<ConvocationResponseRequest>,
) -> Result<Json<Convocation>, ApiError> {
    let student_id = caller(&headers)?.as_student()?;
    let record = placement.convocations.respond(
        ConvocationId(convocation_id),
        student_id,
        request.accept,
    )?;
    Ok(Json(record))
}

pub(crate) async fn create_entente_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Json(request): Json<CreateEntenteRequest>,
) -> Result<(StatusCode, Json<EntenteStage>), ApiError> {
    caller(&headers)?.as_gestionnaire()?;
    let record = placement
        .ententes
        .create_draft(request.candidature_id, &request.missions_objectifs)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn list_ententes_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
) -> Result<Json<Vec<EntenteStage>>, ApiError> {
    let actor = caller(&headers)?;
    Ok(Json(placement.directory.ententes_for(&actor)?))
}

pub(crate) async fn entente_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
) -> Result<Json<EntenteView>, ApiError> {
    let actor = caller(&headers)?;
    let view = placement
        .directory
        .entente_view(EntenteId(entente_id), &actor)?;
    Ok(Json(view))
}

pub(crate) async fn missions_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
    Json(request): Json<MissionsRequest>,
) -> Result<Json<EntenteStage>, ApiError> {
    caller(&headers)?.as_gestionnaire()?;
    let record = placement
        .ententes
        .update_missions(EntenteId(entente_id), &request.missions_objectifs)?;
    Ok(Json(record))
}

pub(crate) async fn assign_professeur_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
    Json(request): Json<AssignProfesseurRequest>,
) -> Result<Json<EntenteStage>, ApiError> {
    caller(&headers)?.as_gestionnaire()?;
    let record = placement
        .ententes
        .assign_professeur(EntenteId(entente_id), request.professeur_id)?;
    Ok(Json(record))
}

pub(crate) async fn request_signatures_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
) -> Result<Json<EntenteStage>, ApiError> {
    let gestionnaire_id = caller(&headers)?.as_gestionnaire()?;
    let record = placement
        .ententes
        .request_signatures(EntenteId(entente_id), gestionnaire_id)?;
    Ok(Json(record))
}

pub(crate) async fn sign_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
) -> Result<Json<EntenteStage>, ApiError> {
    let actor = caller(&headers)?;
    let id = EntenteId(entente_id);
    let record = match actor.role {
        Role::Etudiant => placement
            .ententes
            .signer_par_etudiant(id, actor.as_student()?)?,
        Role::Employeur => placement
            .ententes
            .signer_par_employeur(id, actor.as_employeur()?)?,
        _ => placement
            .ententes
            .signer_par_gestionnaire(id, actor.as_gestionnaire()?)?,
    };
    Ok(Json(record))
}

pub(crate) async fn submit_evaluation_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
    Json(request): Json<EvaluationRequest>,
) -> Result<(StatusCode, Json<Evaluation>), ApiError> {
    let actor = caller(&headers)?;
    let record = placement.evaluations.submit(
        EntenteId(entente_id),
        &actor,
        request.kind,
        request.score,
        &request.comments,
    )?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn list_evaluations_handler(
    State(placement): PlacementState,
    headers: HeaderMap,
    Path(entente_id): Path<u64>,
) -> Result<Json<Vec<Evaluation>>, ApiError> {
    let actor = caller(&headers)?;
    let records = placement
        .directory
        .evaluations_for_entente(EntenteId(entente_id), &actor)?;
    Ok(Json(records))
}
