use std::sync::Arc;
use axum::{extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{JobExt, MessageExt, UserExt},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn messages_handler() -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/inbox", get(get_inbox))
        .route("/with/:user_id", get(get_conversation))
        .route("/:message_id/read", put(mark_message_read))
        .route("/unread-count", get(get_unread_count))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageDto {
    pub recipient_id: Uuid,
    pub job_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Message body is required"))]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<crate::models::messagemodel::Message>,
    pub page: u32,
    pub limit: u32,
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    //Verify the recipient exist
    let recipient = app_state.db_client
        .get_user(Some(body.recipient_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Recipient not found"))?;

    //if a Job is provided verify it exist
    if let Some(job_id) = body.job_id {
        let _ = app_state.db_client
            .get_job(job_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("Job not found"))?;
    }

    let message = app_state.db_client
        .send_message(auth.user.id, body.recipient_id, body.job_id, body.body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = app_state
        .notification_service
        .notify_new_message(recipient.id, &auth.user.name, message.job_id)
        .await
    {
        tracing::error!("Failed to send message notification: {}", e);
        // Don't fail the request if the notification fails
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": message
    })))
}

pub async fn get_inbox(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(20) as i64;
    let offset = ((page - 1) * limit as u32) as i64;

    let messages = app_state.db_client
        .get_inbox(auth.user.id, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = MessageListResponse {
        messages,
        page,
        limit: limit as u32,
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": response
    })))
}

pub async fn get_conversation(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(20) as i64;
    let offset = ((page - 1) * limit as u32) as i64;

    let messages = app_state.db_client
        .get_conversation(auth.user.id, user_id, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = MessageListResponse {
        messages,
        page,
        limit: limit as u32,
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": response
    })))
}

pub async fn mark_message_read(
    Path(message_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let message = app_state.db_client
        .mark_message_read(message_id, auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Message not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": message
    })))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state.db_client
        .get_unread_message_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "unread_count": count
        }
    })))
}
