use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assignmentmodel::JobAssignment;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentDto {
    pub job_id: Uuid,
    pub field_worker_id: Uuid,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStageDto {
    pub job_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentData {
    pub assignment: JobAssignment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentResponseDto {
    pub status: String,
    pub data: AssignmentData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentListResponseDto {
    pub status: String,
    pub assignments: Vec<JobAssignment>,
    pub results: i64,
}
