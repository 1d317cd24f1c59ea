use thiserror::Error;
use uuid::Uuid;
use crate::{
    models::assignmentmodel::WorkflowStage,
    error::HttpError,
};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("No assignment exists for job {0}")]
    AssignmentNotFound(Uuid),

    #[error("Job {0} already has an assignment")]
    AlreadyAssigned(Uuid),

    #[error("Assignment for job {0} is not at stage {1:?}")]
    StageConflict(Uuid, WorkflowStage),

    #[error("User {0} is not the expected actor for job {1} at its current stage")]
    UnauthorizedStageActor(Uuid, Uuid),

    #[error("No approved {0} is available for assignment")]
    NoReviewerAvailable(String),

    #[error("Report template {0} not found")]
    TemplateNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::JobNotFound(_)
            | ServiceError::AssignmentNotFound(_)
            | ServiceError::TemplateNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::AlreadyAssigned(_) => {
                HttpError::unique_constraint_violation(error.to_string())
            }

            ServiceError::StageConflict(_, _)
            | ServiceError::NoReviewerAvailable(_)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::UnauthorizedStageActor(_, _) => {
                HttpError::unauthorized(error.to_string())
            }

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::AssignmentNotFound(_)
            | ServiceError::TemplateNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::AlreadyAssigned(_) => StatusCode::CONFLICT,

            ServiceError::StageConflict(_, _)
            | ServiceError::NoReviewerAvailable(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::UnauthorizedStageActor(_, _) => StatusCode::UNAUTHORIZED,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ServiceError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_conflict_maps_to_bad_request() {
        let err = ServiceError::StageConflict(Uuid::new_v4(), WorkflowStage::Qa);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn already_assigned_maps_to_conflict() {
        let err = ServiceError::AlreadyAssigned(Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn unexpected_actor_maps_to_unauthorized() {
        let err = ServiceError::UnauthorizedStageActor(Uuid::new_v4(), Uuid::new_v4());
        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::UNAUTHORIZED);
    }
}
