use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use slate_core::errors::AppError;
use slate_core::pagination::PaginationMeta;
use slate_models::exams::ExamSummary;
use slate_models::ids::GenerationId;
use slate_models::report_cards::{
    CreateGenerationDto, GenerationFilterParams, GenerationWithCount, ReportCardView,
};
use slate_models::scope::ReportCardScope;
use slate_models::students::ChildInfo;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::report_cards::service::ReportCardService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportCardsResponse {
    pub report_cards: Vec<ReportCardView>,
    pub exam_summaries: Vec<ExamSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentReportCardsResponse {
    pub report_cards: Vec<ReportCardView>,
    pub children: Vec<ChildInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationsResponse {
    pub generations: Vec<GenerationWithCount>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenerationResponse {
    pub message: String,
    pub generation_id: GenerationId,
    pub report_cards: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishGenerationResponse {
    pub message: String,
    pub published_report_cards: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGenerationResponse {
    pub message: String,
    pub deleted_report_cards: u64,
}

#[utoipa::path(
    get,
    path = "/api/report-cards/student",
    responses(
        (status = 200, description = "The caller's published report cards and summaries", body = StudentReportCardsResponse),
        (status = 401, description = "Not authenticated as a student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn student_report_cards(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentReportCardsResponse>, AppError> {
    let identity = auth_user.identity()?;

    let scope = match ReportCardScope::for_identity(&identity) {
        Some(scope @ ReportCardScope::OwnPublished(_)) => scope,
        _ => {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Only students can view their own report cards here"
            )));
        }
    };

    let report_cards = ReportCardService::list_report_cards(&state.db, scope).await?;
    let exam_summaries =
        ReportCardService::list_summaries_for_student(&state.db, identity.user_id.into()).await?;

    let count = report_cards.len();
    Ok(Json(StudentReportCardsResponse {
        report_cards,
        exam_summaries,
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/report-cards/parent",
    responses(
        (status = 200, description = "Published report cards of the caller's children", body = ParentReportCardsResponse),
        (status = 401, description = "Not authenticated as a parent", body = ErrorResponse),
        (status = 404, description = "No linked children", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn parent_report_cards(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ParentReportCardsResponse>, AppError> {
    let identity = auth_user.identity()?;

    let scope = match ReportCardScope::for_identity(&identity) {
        Some(scope @ ReportCardScope::ChildrenPublished(_)) => scope,
        _ => {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Only parents can view their children's report cards"
            )));
        }
    };

    let children = StudentService::get_children_of_parent(&state.db, identity.user_id).await?;
    if children.is_empty() {
        return Err(AppError::not_found(anyhow::anyhow!(
            "No students are linked to this parent account"
        )));
    }

    let report_cards = ReportCardService::list_report_cards(&state.db, scope).await?;

    Ok(Json(ParentReportCardsResponse {
        report_cards,
        children,
    }))
}

#[utoipa::path(
    get,
    path = "/api/report-cards/generations",
    responses(
        (status = 200, description = "Generation batches visible to the caller", body = GenerationsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn list_generations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<GenerationFilterParams>,
) -> Result<Json<GenerationsResponse>, AppError> {
    let identity = auth_user.identity()?;

    let (generations, meta) =
        ReportCardService::list_generations(&state.db, &identity, filters).await?;

    Ok(Json(GenerationsResponse { generations, meta }))
}

#[utoipa::path(
    post,
    path = "/api/report-cards/generations",
    request_body = CreateGenerationDto,
    responses(
        (status = 200, description = "Generation created", body = CreateGenerationResponse),
        (status = 400, description = "Class/exam mismatch or empty class", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Exam or class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn create_generation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<CreateGenerationDto>,
) -> Result<Json<CreateGenerationResponse>, AppError> {
    let identity = auth_user.identity()?;

    let (generation_id, report_cards) =
        ReportCardService::create_generation(&state.db, &identity, dto).await?;

    Ok(Json(CreateGenerationResponse {
        message: "Report cards generated successfully".to_string(),
        generation_id,
        report_cards,
    }))
}

#[utoipa::path(
    post,
    path = "/api/report-cards/generations/{id}/publish",
    params(("id" = GenerationId, Path, description = "Generation batch ID")),
    responses(
        (status = 200, description = "Batch published", body = PublishGenerationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Generation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn publish_generation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GenerationId>,
) -> Result<Json<PublishGenerationResponse>, AppError> {
    let identity = auth_user.identity()?;

    let published_report_cards =
        ReportCardService::publish_generation(&state.db, &identity, id).await?;

    Ok(Json(PublishGenerationResponse {
        message: "Report cards published successfully".to_string(),
        published_report_cards,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/report-cards/generations/{id}",
    params(("id" = GenerationId, Path, description = "Generation batch ID")),
    responses(
        (status = 200, description = "Batch deleted", body = DeleteGenerationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Wrong role or non-owning teacher", body = ErrorResponse),
        (status = 404, description = "Generation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report Cards"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_generation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<GenerationId>,
) -> Result<Json<DeleteGenerationResponse>, AppError> {
    let identity = auth_user.identity()?;

    let deleted_report_cards =
        ReportCardService::delete_generation(&state.db, &identity, id).await?;

    Ok(Json(DeleteGenerationResponse {
        message: "Report card generation deleted successfully".to_string(),
        deleted_report_cards,
    }))
}
