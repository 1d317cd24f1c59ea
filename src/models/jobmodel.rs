use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// Vocabulary for the free-form `jobs.status` column. The column itself is
/// plain VARCHAR; this enum is the single source for the strings written
/// into it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Assigned,
    FieldComplete,
    QaComplete,
    Completed,
    Invoiced,
    Paid,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Assigned => "assigned",
            JobStatus::FieldComplete => "field_complete",
            JobStatus::QaComplete => "qa_complete",
            JobStatus::Completed => "completed",
            JobStatus::Invoiced => "invoiced",
            JobStatus::Paid => "paid",
        }
    }

    pub fn from_str(value: &str) -> Option<JobStatus> {
        match value {
            "created" => Some(JobStatus::Created),
            "assigned" => Some(JobStatus::Assigned),
            "field_complete" => Some(JobStatus::FieldComplete),
            "qa_complete" => Some(JobStatus::QaComplete),
            "completed" => Some(JobStatus::Completed),
            "invoiced" => Some(JobStatus::Invoiced),
            "paid" => Some(JobStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub reference: String,
    pub created_by: Uuid,
    pub template_key: String,
    pub client_info: serde_json::Value,
    pub asset_details: serde_json::Value,
    pub valuation_details: serde_json::Value,
    pub status: String,
    // records which user touched which stage: {"admin": id, "field": id, ...}
    pub chain: serde_json::Value,
    pub fee: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            JobStatus::Created,
            JobStatus::Assigned,
            JobStatus::FieldComplete,
            JobStatus::QaComplete,
            JobStatus::Completed,
            JobStatus::Invoiced,
            JobStatus::Paid,
        ] {
            assert_eq!(JobStatus::from_str(status.to_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_string_is_none() {
        assert_eq!(JobStatus::from_str("archived"), None);
        assert_eq!(JobStatus::from_str(""), None);
    }
}
