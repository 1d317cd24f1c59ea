use std::sync::Arc;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::HttpError, middleware::JWTAuthMiddeware,
    models::notificationmodel::Notification, AppState,
};

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notifications: Vec<Notification>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data,
        }
    }
}

pub fn notifications_handler() -> Router {
    Router::new()
        .route("/", get(get_user_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/read-all", put(mark_all_notifications_read))
        .route("/:id/read", put(mark_single_notification_read))
}

// Get user notifications with pagination
async fn get_user_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(20).min(100) as i64;
    let offset = ((page - 1) * limit as u32) as i64;

    println!("📬 [get_user_notifications] Fetching for user: {}", auth.user.id);

    // Get total count
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM notifications
        WHERE user_id = $1
        "#
    )
    .bind(auth.user.id)
    .fetch_one(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [get_user_notifications] Count query failed: {}", e);
        HttpError::server_error(format!("Failed to count notifications: {}", e))
    })?;

    // Get unread count
    let unread_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM notifications
        WHERE user_id = $1 AND is_read = false
        "#
    )
    .bind(auth.user.id)
    .fetch_one(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [get_user_notifications] Unread count query failed: {}", e);
        HttpError::server_error(format!("Failed to count unread notifications: {}", e))
    })?;

    // Get notifications
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, user_id, notification_type, job_id,
               metadata, message, is_read, created_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    )
    .bind(auth.user.id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [get_user_notifications] Query failed: {}", e);
        HttpError::server_error(format!("Failed to fetch notifications: {}", e))
    })?;

    println!("✅ [get_user_notifications] Found {} notifications", notifications.len());

    let response = NotificationResponse {
        notifications,
        total,
        page,
        limit: limit as u32,
        unread_count,
    };

    Ok(Json(response))
}

// Get unread count
async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    println!("📬 [get_unread_count] Fetching for user: {}", auth.user.id);

    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM notifications
        WHERE user_id = $1 AND is_read = false
        "#
    )
    .bind(auth.user.id)
    .fetch_one(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [get_unread_count] Query failed: {}", e);
        HttpError::server_error(format!("Failed to count notifications: {}", e))
    })?;

    println!("✅ [get_unread_count] Unread count: {}", count);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "unread_count": count
        }
    })))
}

// Mark all notifications as read
async fn mark_all_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    println!("📬 [mark_all_notifications_read] For user: {}", auth.user.id);

    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = true
        WHERE user_id = $1 AND is_read = false
        "#
    )
    .bind(auth.user.id)
    .execute(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [mark_all_notifications_read] Failed: {}", e);
        HttpError::server_error(format!("Failed to mark all notifications as read: {}", e))
    })?;

    println!("✅ [mark_all_notifications_read] Marked {} notifications as read", result.rows_affected());

    Ok(Json(ApiResponse::success(
        "All notifications marked as read",
        serde_json::json!({
            "updated_count": result.rows_affected()
        }),
    )))
}

// Mark single notification as read
async fn mark_single_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    println!("📬 [mark_single_notification_read] Notification: {}", notification_id);

    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = true
        WHERE id = $1 AND user_id = $2
        "#
    )
    .bind(notification_id)
    .bind(auth.user.id)
    .execute(&app_state.db_client.pool)
    .await
    .map_err(|e| {
        println!("❌ [mark_single_notification_read] Failed: {}", e);
        HttpError::server_error(format!("Failed to mark notification as read: {}", e))
    })?;

    if result.rows_affected() == 0 {
        return Err(HttpError::not_found("Notification not found"));
    }

    println!("✅ [mark_single_notification_read] Marked as read");

    Ok(Json(ApiResponse::success(
        "Notification marked as read",
        serde_json::json!({}),
    )))
}
