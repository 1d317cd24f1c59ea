use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    db::UserExt,
    dtos::{
        FilterUserDto, ForgotPasswordRequestDto, LoginUserDto, RegisterUserDto,
        ResetPasswordRequestDto, Response, UserData, UserLoginResponseDto, UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_forgot_password_email,
    models::usermodel::UserRole,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing_user.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::EmailExist.to_string(),
        ));
    }

    let hashed_password = password::hash(&body.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(
            body.name.clone(),
            body.email.clone(),
            hashed_password,
            body.phone.clone(),
            body.role,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Let the people who can approve accounts know someone is waiting
    for approver_role in [UserRole::Md, UserRole::QaOfficer] {
        let approvers = app_state
            .db_client
            .get_users_by_role(approver_role)
            .await
            .unwrap_or_default();

        for approver in approvers {
            if let Err(e) = app_state
                .notification_service
                .notify_account_pending(approver.id, &user.name, user.role.to_str())
                .await
            {
                tracing::error!("Failed to send pending-account notification: {}", e);
                // Don't fail the request if the notification fails
            }
        }
    }

    let filtered_user = FilterUserDto::filter_user(&user);

    Ok((
        StatusCode::CREATED,
        Json(UserResponseDto {
            status: "success".to_string(),
            data: UserData {
                user: filtered_user,
            },
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::bad_request(
        ErrorMessage::WrongCredentials.to_string(),
    ))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if !user.approved {
        return Err(HttpError::new(
            ErrorMessage::AccountNotApproved.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage * 60);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut headers = HeaderMap::new();

    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build auth cookie".to_string()))?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn forgot_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ForgotPasswordRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::bad_request("Email not found!".to_string()))?;

    let verification_token = uuid::Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::minutes(30);

    app_state
        .db_client
        .add_verifed_token(user.id, &verification_token, expires_at)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let reset_link = format!(
        "{}/reset-password?token={}",
        app_state.env.app_url, &verification_token
    );

    let email_sent = send_forgot_password_email(&user.email, &reset_link, &user.name).await;

    if let Err(e) = email_sent {
        eprintln!("Failed to send forgot password email: {}", e);
        return Err(HttpError::server_error("Failed to send email".to_string()));
    }

    let response = Response {
        message: "Password reset link has been sent to your email.".to_string(),
        status: "success",
    };

    Ok(Json(response))
}

pub async fn reset_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, None, Some(&body.token))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::bad_request(
        "Invalid or expired token".to_string(),
    ))?;

    if let Some(expires_at) = user.token_expires_at {
        if Utc::now() > expires_at {
            return Err(HttpError::bad_request(
                "Verification token has expired".to_string(),
            ))?;
        }
    } else {
        return Err(HttpError::bad_request(
            "Invalid verification token".to_string(),
        ))?;
    }

    let hash_password = password::hash(&body.new_password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user.id, hash_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .verifed_token(&body.token)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = Response {
        message: "Password has been successfully reset.".to_string(),
        status: "success",
    };

    Ok(Json(response))
}
