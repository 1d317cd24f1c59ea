// services/notification_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::jobmodel::Job,
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn notify_account_pending(
        &self,
        approver_id: Uuid,
        applicant_name: &str,
        applicant_role: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Registration notification: {} requested the {} role",
            applicant_name,
            applicant_role
        );

        self.store_notification(
            Some(approver_id),
            "account_pending".to_string(),
            None,
            Some(serde_json::json!({
                "applicant_name": applicant_name,
                "requested_role": applicant_role
            })),
            format!("{} registered and is awaiting approval", applicant_name),
        ).await
    }

    pub async fn notify_account_approved(&self, user_id: Uuid) -> Result<(), ServiceError> {
        tracing::info!("Approval notification: user {} was approved", user_id);

        self.store_notification(
            Some(user_id),
            "account_approved".to_string(),
            None,
            None,
            "Your account has been approved. You can now log in.".to_string(),
        ).await
    }

    pub async fn notify_job_assigned(
        &self,
        field_worker_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Assignment notification: worker {} assigned to job {}",
            field_worker_id,
            job.reference
        );

        self.store_notification(
            Some(field_worker_id),
            "job_assigned".to_string(),
            Some(job.id),
            Some(serde_json::json!({
                "reference": job.reference,
                "template_key": job.template_key
            })),
            format!("You've been assigned field work for job {}", job.reference),
        ).await
    }

    pub async fn notify_stage_handoff(
        &self,
        reviewer_id: Uuid,
        job: &Job,
        stage: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Handoff notification: job {} moved to {} review",
            job.reference,
            stage
        );

        self.store_notification(
            Some(reviewer_id),
            "stage_handoff".to_string(),
            Some(job.id),
            Some(serde_json::json!({
                "reference": job.reference,
                "stage": stage
            })),
            format!("Job {} is waiting for your {} review", job.reference, stage),
        ).await
    }

    pub async fn notify_job_completed(
        &self,
        user_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        tracing::info!("Completion notification: job {} signed off", job.reference);

        self.store_notification(
            Some(user_id),
            "job_completed".to_string(),
            Some(job.id),
            Some(serde_json::json!({
                "reference": job.reference
            })),
            format!("Job {} has been completed and signed off", job.reference),
        ).await
    }

    pub async fn notify_job_invoiced(
        &self,
        user_id: Uuid,
        job: &Job,
        fee: f64,
    ) -> Result<(), ServiceError> {
        self.store_notification(
            Some(user_id),
            "job_invoiced".to_string(),
            Some(job.id),
            Some(serde_json::json!({
                "reference": job.reference,
                "fee": fee
            })),
            format!("Invoice raised for job {}", job.reference),
        ).await
    }

    pub async fn notify_report_submitted(
        &self,
        user_id: Uuid,
        job: &Job,
        section: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Report notification: {} data submitted for job {}",
            section,
            job.reference
        );

        self.store_notification(
            Some(user_id),
            "report_submitted".to_string(),
            Some(job.id),
            Some(serde_json::json!({
                "reference": job.reference,
                "section": section
            })),
            format!("The {} section of report {} was submitted", section, job.reference),
        ).await
    }

    pub async fn notify_new_message(
        &self,
        recipient_id: Uuid,
        sender_name: &str,
        job_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        self.store_notification(
            Some(recipient_id),
            "new_message".to_string(),
            job_id,
            Some(serde_json::json!({
                "sender_name": sender_name
            })),
            format!("New message from {}", sender_name),
        ).await
    }

    async fn store_notification(
        &self,
        user_id: Option<Uuid>,
        notification_type: String,
        job_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<(), ServiceError> {
        if let Some(uid) = user_id {
            sqlx::query(
                r#"
                INSERT INTO notifications
                (user_id, notification_type, job_id, metadata, message, created_at)
                VALUES ($1, $2, $3, $4, $5, NOW())
                "#
            )
            .bind(uid)
            .bind(notification_type)
            .bind(job_id)
            .bind(metadata)
            .bind(message)
            .execute(&self.db_client.pool)
            .await?;
        }

        Ok(())
    }
}
