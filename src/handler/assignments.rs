use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::AssignmentExt,
    dtos::{
        AdvanceStageDto, AssignmentData, AssignmentListResponseDto, AssignmentResponseDto,
        CreateAssignmentDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn assignments_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_assignment).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/advance", post(advance_stage))
        .route("/mine", get(my_assignments))
        .route("/job/:job_id", get(get_job_assignment))
}

pub async fn create_assignment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateAssignmentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let assignment = app_state
        .workflow_service
        .assign_field_worker(body.job_id, body.field_worker_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentResponseDto {
            status: "success".to_string(),
            data: AssignmentData { assignment },
        }),
    ))
}

/// The caller must be the actor the assignment is currently waiting on;
/// the workflow service rejects everyone else.
pub async fn advance_stage(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<AdvanceStageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let assignment = app_state
        .workflow_service
        .advance_stage(auth.user.id, body.job_id)
        .await?;

    Ok(Json(AssignmentResponseDto {
        status: "success".to_string(),
        data: AssignmentData { assignment },
    }))
}

pub async fn my_assignments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let assignments = app_state
        .db_client
        .get_active_assignments(auth.user.id, auth.user.role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = assignments.len() as i64;

    Ok(Json(AssignmentListResponseDto {
        status: "success".to_string(),
        assignments,
        results,
    }))
}

pub async fn get_job_assignment(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let assignment = app_state
        .db_client
        .get_assignment_by_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No assignment exists for this job"))?;

    Ok(Json(AssignmentResponseDto {
        status: "success".to_string(),
        data: AssignmentData { assignment },
    }))
}
