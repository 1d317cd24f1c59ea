use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub job_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
