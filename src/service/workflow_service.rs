// services/workflow_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    db::{AssignmentExt, JobExt, UserExt},
    models::{
        assignmentmodel::{JobAssignment, WorkflowStage},
        jobmodel::Job,
        usermodel::UserRole,
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

#[derive(Debug, Clone)]
pub struct WorkflowService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl WorkflowService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Admin puts a field worker on a created job. The insert and the job
    /// status mirror happen in one transaction inside the db layer.
    pub async fn assign_field_worker(
        &self,
        job_id: Uuid,
        field_worker_id: Uuid,
    ) -> Result<JobAssignment, ServiceError> {
        let job = self
            .db_client
            .get_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let worker = self
            .db_client
            .get_user(Some(field_worker_id), None, None)
            .await?
            .ok_or_else(|| ServiceError::Validation("Field worker not found".to_string()))?;

        if worker.role != UserRole::FieldTeam {
            return Err(ServiceError::Validation(format!(
                "User {} is not a field team member",
                field_worker_id
            )));
        }

        if !worker.approved {
            return Err(ServiceError::Validation(format!(
                "User {} has not been approved yet",
                field_worker_id
            )));
        }

        let chain_entry = serde_json::json!({ "field": field_worker_id });

        let assignment = self
            .db_client
            .create_assignment(job_id, field_worker_id, chain_entry)
            .await?
            .ok_or(ServiceError::AlreadyAssigned(job_id))?;

        if let Err(e) = self
            .notification_service
            .notify_job_assigned(field_worker_id, &job)
            .await
        {
            tracing::error!("Failed to send assignment notification: {}", e);
            // Don't fail the request if the notification fails
        }

        Ok(assignment)
    }

    /// The single advance entry point. The caller must be the actor the
    /// current stage expects; the guarded UPDATE in the db layer turns a
    /// lost race into a stage conflict instead of a double advance.
    pub async fn advance_stage(
        &self,
        actor_id: Uuid,
        job_id: Uuid,
    ) -> Result<JobAssignment, ServiceError> {
        let job = self
            .db_client
            .get_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let assignment = self
            .db_client
            .get_assignment_by_job(job_id)
            .await?
            .ok_or(ServiceError::AssignmentNotFound(job_id))?;

        if assignment.current_stage == WorkflowStage::Complete {
            return Err(ServiceError::StageConflict(job_id, WorkflowStage::Complete));
        }

        match assignment.expected_actor() {
            Some(expected) if expected == actor_id => {}
            _ => return Err(ServiceError::UnauthorizedStageActor(actor_id, job_id)),
        }

        match assignment.current_stage {
            WorkflowStage::Field => self.complete_field_work(&job).await,
            WorkflowStage::Qa => self.complete_qa_review(&job).await,
            WorkflowStage::Md => self.complete_md_signoff(&job).await,
            WorkflowStage::Complete => {
                Err(ServiceError::StageConflict(job_id, WorkflowStage::Complete))
            }
        }
    }

    async fn complete_field_work(&self, job: &Job) -> Result<JobAssignment, ServiceError> {
        let qa_id = self
            .db_client
            .least_loaded_qa_officer()
            .await?
            .ok_or_else(|| ServiceError::NoReviewerAvailable("QA officer".to_string()))?;

        let chain_entry = serde_json::json!({ "qa": qa_id });

        let updated = self
            .db_client
            .complete_field_stage(job.id, qa_id, chain_entry)
            .await?
            .ok_or(ServiceError::StageConflict(job.id, WorkflowStage::Field))?;

        if let Err(e) = self
            .notification_service
            .notify_stage_handoff(qa_id, job, "QA")
            .await
        {
            tracing::error!("Failed to send QA handoff notification: {}", e);
            // Don't fail the request if the notification fails
        }

        Ok(updated)
    }

    async fn complete_qa_review(&self, job: &Job) -> Result<JobAssignment, ServiceError> {
        let md_id = self
            .db_client
            .least_loaded_md()
            .await?
            .ok_or_else(|| ServiceError::NoReviewerAvailable("MD".to_string()))?;

        let chain_entry = serde_json::json!({ "md": md_id });

        let updated = self
            .db_client
            .complete_qa_stage(job.id, md_id, chain_entry)
            .await?
            .ok_or(ServiceError::StageConflict(job.id, WorkflowStage::Qa))?;

        if let Err(e) = self
            .notification_service
            .notify_stage_handoff(md_id, job, "MD")
            .await
        {
            tracing::error!("Failed to send MD handoff notification: {}", e);
            // Don't fail the request if the notification fails
        }

        Ok(updated)
    }

    async fn complete_md_signoff(&self, job: &Job) -> Result<JobAssignment, ServiceError> {
        let updated = self
            .db_client
            .complete_md_stage(job.id)
            .await?
            .ok_or(ServiceError::StageConflict(job.id, WorkflowStage::Md))?;

        if let Err(e) = self
            .notification_service
            .notify_job_completed(job.created_by, job)
            .await
        {
            tracing::error!("Failed to send completion notification: {}", e);
            // Don't fail the request if the notification fails
        }

        if let Ok(Some(creator)) = self
            .db_client
            .get_user(Some(job.created_by), None, None)
            .await
        {
            if let Err(e) = crate::mail::mails::send_job_completed_email(
                &creator.email,
                &creator.name,
                &job.reference,
            )
            .await
            {
                tracing::error!("Failed to send completion email: {}", e);
                // Don't fail the request if email fails
            }
        }

        Ok(updated)
    }
}
