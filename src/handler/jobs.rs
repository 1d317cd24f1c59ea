use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use num_traits::ToPrimitive;
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::JobExt,
    dtos::{
        CreateJobDto, InvoiceJobDto, JobData, JobQueryDto, JobResponseDto, JobListResponseDto,
        JobStatsResponseDto, JobStatusCountDto, UpdateJobDetailsDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::{jobmodel::JobStatus, usermodel::UserRole},
    service::reference::generate_job_reference,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_job).get(list_jobs).layer(middleware::from_fn(
                |state, req, next| {
                    role_check(
                        state,
                        req,
                        next,
                        vec![
                            UserRole::Admin,
                            UserRole::Md,
                            UserRole::QaOfficer,
                            UserRole::Accounts,
                        ],
                    )
                },
            )),
        )
        .route(
            "/stats",
            get(get_job_stats).layer(middleware::from_fn(|state, req, next| {
                role_check(
                    state,
                    req,
                    next,
                    vec![UserRole::Admin, UserRole::Md, UserRole::Accounts],
                )
            })),
        )
        .route("/:job_id", get(get_job).put(update_job))
        .route(
            "/:job_id/invoice",
            put(invoice_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Accounts])
            })),
        )
        .route(
            "/:job_id/paid",
            put(mark_job_paid).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Accounts])
            })),
        )
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Admin {
        return Err(HttpError::unauthorized("Only admins can onboard jobs"));
    }

    if !app_state.template_store.contains(&body.template_key) {
        return Err(HttpError::bad_request(format!(
            "Unknown report template: {}",
            body.template_key
        )));
    }

    let reference = generate_job_reference();
    let chain = serde_json::json!({ "admin": auth.user.id });

    let job = app_state
        .db_client
        .save_job(
            reference,
            auth.user.id,
            body.template_key,
            body.client_info,
            body.asset_details.unwrap_or_else(|| serde_json::json!({})),
            body.valuation_details
                .unwrap_or_else(|| serde_json::json!({})),
            chain,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(JobResponseDto {
            status: "success".to_string(),
            data: JobData { job },
        }),
    ))
}

pub async fn list_jobs(
    Query(query_params): Query<JobQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);
    let status = query_params.status.as_deref();

    let jobs = app_state
        .db_client
        .get_jobs(page as u32, limit, status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let job_count = app_state
        .db_client
        .get_job_count(status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = JobListResponseDto {
        status: "success".to_string(),
        jobs,
        results: job_count,
    };

    Ok(Json(response))
}

pub async fn get_job(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: JobData { job },
    }))
}

pub async fn update_job(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateJobDetailsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Admin {
        return Err(HttpError::unauthorized("Only admins can edit job details"));
    }

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let updated = app_state
        .db_client
        .update_job_details(
            job_id,
            body.client_info.unwrap_or(job.client_info),
            body.asset_details.unwrap_or(job.asset_details),
            body.valuation_details.unwrap_or(job.valuation_details),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: JobData { job: updated },
    }))
}

pub async fn invoice_job(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<InvoiceJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.status != JobStatus::Completed.to_str() {
        return Err(HttpError::bad_request(format!(
            "Job {} cannot be invoiced while its status is '{}'",
            job.reference, job.status
        )));
    }

    let fee = BigDecimal::try_from(body.fee)
        .map_err(|_| HttpError::bad_request("Invalid fee amount".to_string()))?;

    let chain_entry = serde_json::json!({ "accounts": auth.user.id });

    let invoiced = app_state
        .db_client
        .mark_job_invoiced(job_id, fee, chain_entry)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let fee_amount = invoiced.fee.as_ref().and_then(|f| f.to_f64()).unwrap_or(0.0);

    if let Err(e) = app_state
        .notification_service
        .notify_job_invoiced(invoiced.created_by, &invoiced, fee_amount)
        .await
    {
        tracing::error!("Failed to send invoice notification: {}", e);
        // Don't fail the request if the notification fails
    }

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: JobData { job: invoiced },
    }))
}

pub async fn mark_job_paid(
    Path(job_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.status != JobStatus::Invoiced.to_str() {
        return Err(HttpError::bad_request(format!(
            "Job {} cannot be marked paid while its status is '{}'",
            job.reference, job.status
        )));
    }

    let paid = app_state
        .db_client
        .update_job_status(job_id, JobStatus::Paid.to_str())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: JobData { job: paid },
    }))
}

pub async fn get_job_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let counts = app_state
        .db_client
        .get_job_status_counts()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total: i64 = counts.iter().map(|c| c.count).sum();

    let counts = counts
        .into_iter()
        .map(|c| JobStatusCountDto {
            status: c.status,
            count: c.count,
        })
        .collect();

    Ok(Json(JobStatsResponseDto {
        status: "success".to_string(),
        total,
        counts,
    }))
}
