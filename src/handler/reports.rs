use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{AssignmentExt, JobExt, ReportExt},
    dtos::{
        CreateReportDto, ReportData, ReportProgressResponseDto, ReportResponseDto,
        ReportSectionDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn reports_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_report).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/:report_id", get(get_report))
        .route("/job/:job_id", get(get_report_by_job))
        .route("/:report_id/field-data", put(update_field_data))
        .route("/:report_id/qa-data", put(update_qa_data))
        .route("/:report_id/progress", get(get_report_progress))
        .route("/:report_id/pdf", get(download_report_pdf))
}

pub async fn create_report(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateReportDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .db_client
        .get_job(body.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let report = app_state
        .db_client
        .save_report(job.id, job.template_key.clone(), body.admin_data)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::unique_constraint_violation("A report already exists for this job")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ReportResponseDto {
            status: "success".to_string(),
            data: ReportData { report },
        }),
    ))
}

pub async fn get_report(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state
        .db_client
        .get_report(report_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Report not found"))?;

    Ok(Json(ReportResponseDto {
        status: "success".to_string(),
        data: ReportData { report },
    }))
}

pub async fn get_report_by_job(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state
        .db_client
        .get_report_by_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No report exists for this job"))?;

    Ok(Json(ReportResponseDto {
        status: "success".to_string(),
        data: ReportData { report },
    }))
}

pub async fn update_field_data(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<ReportSectionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let report = app_state
        .db_client
        .get_report(report_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Report not found"))?;

    let assignment = app_state
        .db_client
        .get_assignment_by_job(report.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No assignment exists for this job"))?;

    if assignment.field_worker_id != auth.user.id {
        return Err(HttpError::unauthorized(
            "Only the assigned field worker can submit field data",
        ));
    }

    let report = app_state
        .db_client
        .update_field_data(report_id, body.data)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(job) = app_state
        .db_client
        .get_job(report.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
    {
        if let Err(e) = app_state
            .notification_service
            .notify_report_submitted(job.created_by, &job, "field")
            .await
        {
            tracing::error!("Failed to send report notification: {}", e);
            // Don't fail the request if the notification fails
        }
    }

    Ok(Json(ReportResponseDto {
        status: "success".to_string(),
        data: ReportData { report },
    }))
}

pub async fn update_qa_data(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<ReportSectionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let report = app_state
        .db_client
        .get_report(report_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Report not found"))?;

    let assignment = app_state
        .db_client
        .get_assignment_by_job(report.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No assignment exists for this job"))?;

    if assignment.qa_id != Some(auth.user.id) {
        return Err(HttpError::unauthorized(
            "Only the assigned QA officer can submit QA data",
        ));
    }

    let report = app_state
        .db_client
        .update_qa_data(report_id, body.data)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(job) = app_state
        .db_client
        .get_job(report.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
    {
        if let Err(e) = app_state
            .notification_service
            .notify_report_submitted(job.created_by, &job, "qa")
            .await
        {
            tracing::error!("Failed to send report notification: {}", e);
            // Don't fail the request if the notification fails
        }
    }

    Ok(Json(ReportResponseDto {
        status: "success".to_string(),
        data: ReportData { report },
    }))
}

pub async fn get_report_progress(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let progress = app_state
        .db_client
        .get_report_progress(report_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ReportProgressResponseDto {
        status: "success".to_string(),
        progress,
    }))
}

pub async fn download_report_pdf(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state
        .db_client
        .get_report(report_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Report not found"))?;

    let job = app_state
        .db_client
        .get_job(report.job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let pdf_bytes = app_state.pdf_service.render_report_pdf(&job, &report).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "application/pdf"
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build response headers"))?,
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}.pdf\"", job.reference)
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build response headers"))?,
    );

    Ok((headers, pdf_bytes))
}
