use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reportmodel::{Report, ReportProgressEntry};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportDto {
    pub job_id: Uuid,

    pub admin_data: serde_json::Value,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReportSectionDto {
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportData {
    pub report: Report,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponseDto {
    pub status: String,
    pub data: ReportData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportProgressResponseDto {
    pub status: String,
    pub progress: Vec<ReportProgressEntry>,
}
