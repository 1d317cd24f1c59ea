use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One report row per job. The per-role data columns hold whatever JSON the
/// client submitted; nothing checks it against the template schema.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub job_id: Uuid,
    pub template_key: String,
    pub admin_data: Option<serde_json::Value>,
    pub field_data: Option<serde_json::Value>,
    pub qa_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportProgressEntry {
    pub id: Uuid,
    pub report_id: Uuid,
    pub role: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
