use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    FieldTeam,
    QaOfficer,
    Md,
    Accounts,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::FieldTeam => "field_team",
            UserRole::QaOfficer => "qa_officer",
            UserRole::Md => "md",
            UserRole::Accounts => "accounts",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, sqlx::Type, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub approved: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,

    pub token_expires_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_match_database_enum() {
        assert_eq!(UserRole::Admin.to_str(), "admin");
        assert_eq!(UserRole::FieldTeam.to_str(), "field_team");
        assert_eq!(UserRole::QaOfficer.to_str(), "qa_officer");
        assert_eq!(UserRole::Md.to_str(), "md");
        assert_eq!(UserRole::Accounts.to_str(), "accounts");
    }
}
