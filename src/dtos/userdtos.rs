use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::usermodel::{User, UserRole};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: Option<String>,

    #[validate(custom = "validate_registration_role")]
    pub role: UserRole,
}

fn validate_registration_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::FieldTeam | UserRole::QaOfficer | UserRole::Md | UserRole::Accounts => Ok(()),

        UserRole::Admin => {
            let mut error = ValidationError::new("invalid_role");
            error.message = Some(Cow::from(
                "Admin role cannot be requested at registration",
            ));
            Err(error)
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub approved: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            phone: user.phone.clone(),
            role: user.role.to_str().to_string(),
            approved: user.approved,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct NameUpdateDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleUpdateDto {
    pub role: UserRole,
    pub target_user_id: Uuid,
}

#[derive(Debug, Validate, Default, Clone, Serialize, Deserialize)]
pub struct UserPasswordUpdateDto {
    #[validate(
        length(min = 1, message = "New password is required."),
        length(min = 6, message = "new password must be at least 6 characters")
    )]
    pub new_password: String,

    #[validate(
        length(min = 1, message = "New password confirm is required."),
        length(min = 6, message = "new password confirm must be at least 6 characters"),
        must_match(other = "new_password", message = "new passwords do not match")
    )]
    pub new_password_confirm: String,

    #[validate(
        length(min = 1, message = "Old password is required."),
        length(min = 6, message = "Old password must be at least 6 characters")
    )]
    pub old_password: String,
}

#[derive(Deserialize, Serialize, Validate, Debug, Clone)]
pub struct ForgotPasswordRequestDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ResetPasswordRequestDto {
    #[validate(length(min = 1, message = "Token is required."))]
    pub token: String,

    #[validate(
        length(min = 1, message = "New password is required."),
        length(min = 6, message = "new password must be at least 6 characters")
    )]
    pub new_password: String,

    #[validate(
        length(min = 1, message = "New password confirm is required."),
        length(min = 6, message = "new password confirm must be at least 6 characters"),
        must_match(other = "new_password", message = "new passwords do not match")
    )]
    pub new_password_confirm: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_dto() -> RegisterUserDto {
        RegisterUserDto {
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            phone: None,
            role: UserRole::FieldTeam,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(valid_register_dto().validate().is_ok());
    }

    #[test]
    fn mismatched_passwords_fail() {
        let dto = RegisterUserDto {
            password_confirm: "different".to_string(),
            ..valid_register_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn admin_role_cannot_be_requested() {
        let dto = RegisterUserDto {
            role: UserRole::Admin,
            ..valid_register_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn bad_email_fails() {
        let dto = RegisterUserDto {
            email: "not-an-email".to_string(),
            ..valid_register_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn filter_user_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            password: "hashed".to_string(),
            phone: None,
            role: UserRole::QaOfficer,
            approved: true,
            verification_token: None,
            token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let filtered = FilterUserDto::filter_user(&user);
        assert_eq!(filtered.role, "qa_officer");
        assert!(filtered.approved);
        let as_json = serde_json::to_string(&filtered).unwrap();
        assert!(!as_json.contains("hashed"));
    }
}
