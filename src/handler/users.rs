use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::UserExt,
    dtos::{
        FilterUserDto, NameUpdateDto, RequestQueryDto, Response, RoleUpdateDto, UserData,
        UserListResponseDto, UserPasswordUpdateDto, UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_welcome_email,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    utils::password,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route(
            "/",
            get(get_users).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::Md])
            })),
        )
        .route(
            "/pending",
            get(get_pending_users).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Md, UserRole::QaOfficer])
            })),
        )
        .route(
            "/:user_id/approve",
            put(approve_user).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Md, UserRole::QaOfficer])
            })),
        )
        .route(
            "/role",
            put(update_user_role).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Md])
            })),
        )
        .route("/name", put(update_user_name))
        .route("/password", put(update_user_password))
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    let response_data = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    };

    Ok(Json(response_data))
}

pub async fn get_users(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_users(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user_count = app_state
        .db_client
        .get_user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results: user_count,
    };

    Ok(Json(response))
}

pub async fn get_pending_users(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_pending_users(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = users.len() as i64;

    let response = UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results,
    };

    Ok(Json(response))
}

pub async fn approve_user(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(_auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let pending = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if pending.approved {
        return Err(HttpError::bad_request("User is already approved".to_string()));
    }

    let approved_user = app_state
        .db_client
        .approve_user(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = send_welcome_email(&approved_user.email, &approved_user.name).await {
        tracing::error!("Failed to send welcome email: {}", e);
        // Don't fail the request if email fails
    }

    if let Err(e) = app_state
        .notification_service
        .notify_account_approved(user_id)
        .await
    {
        tracing::error!("Failed to send approval notification: {}", e);
        // Don't fail the request if the notification fails
    }

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&approved_user),
        },
    }))
}

pub async fn update_user_name(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<NameUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = &user.user;

    let result = app_state
        .db_client
        .update_user_name(user.id, &body.name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_user = FilterUserDto::filter_user(&result);

    let response = UserResponseDto {
        data: UserData {
            user: filtered_user,
        },
        status: "success".to_string(),
    };

    Ok(Json(response))
}

pub async fn update_user_role(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth_user): Extension<JWTAuthMiddeware>,
    Json(body): Json<RoleUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // MDs cannot demote themselves out of the role that manages roles
    if auth_user.user.id == body.target_user_id && body.role != UserRole::Md {
        return Err(HttpError::unauthorized(
            "MDs cannot remove their own MD status",
        ));
    }

    let updated_user = app_state
        .db_client
        .update_user_role(body.target_user_id, body.role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated_user),
        },
    }))
}

pub async fn update_user_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UserPasswordUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = &user.user;

    let result = app_state
        .db_client
        .get_user(Some(user.id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::unauthorized(
        ErrorMessage::InvalidToken.to_string(),
    ))?;

    let password_match = password::compare(&body.old_password, &user.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !password_match {
        return Err(HttpError::bad_request(
            "Old password is incorrect".to_string(),
        ));
    }

    let hash_password = password::hash(&body.new_password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user.id, hash_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = Response {
        message: "Password updated Successfully".to_string(),
        status: "success",
    };

    Ok(Json(response))
}
