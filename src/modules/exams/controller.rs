use axum::{Json, extract::State};
use tracing::instrument;

use slate_core::errors::AppError;
use slate_models::exams::MyExamsResponse;
use slate_models::scope::ExamScope;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::exams::service::ExamService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/exams/my-exams",
    responses(
        (status = 200, description = "Exams visible to the caller, with derived status", body = MyExamsResponse),
        (status = 400, description = "Unrecognized role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, auth_user))]
pub async fn my_exams(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MyExamsResponse>, AppError> {
    let identity = auth_user.identity()?;
    let scope = ExamScope::for_identity(&identity);

    let exams = ExamService::list_exams(&state.db, scope).await?;

    Ok(Json(MyExamsResponse {
        success: true,
        role: identity.role,
        exams,
    }))
}
