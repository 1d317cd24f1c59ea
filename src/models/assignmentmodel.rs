use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jobmodel::JobStatus;
use super::usermodel::UserRole;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "workflow_stage", rename_all = "snake_case")]
pub enum WorkflowStage {
    Field,
    Qa,
    Md,
    Complete,
}

impl WorkflowStage {
    pub fn to_str(&self) -> &str {
        match self {
            WorkflowStage::Field => "field",
            WorkflowStage::Qa => "qa",
            WorkflowStage::Md => "md",
            WorkflowStage::Complete => "complete",
        }
    }

    /// The stage a successful advance moves to. `Complete` is terminal.
    pub fn next(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::Field => Some(WorkflowStage::Qa),
            WorkflowStage::Qa => Some(WorkflowStage::Md),
            WorkflowStage::Md => Some(WorkflowStage::Complete),
            WorkflowStage::Complete => None,
        }
    }

    /// Which role acts at this stage.
    pub fn actor_role(&self) -> Option<UserRole> {
        match self {
            WorkflowStage::Field => Some(UserRole::FieldTeam),
            WorkflowStage::Qa => Some(UserRole::QaOfficer),
            WorkflowStage::Md => Some(UserRole::Md),
            WorkflowStage::Complete => None,
        }
    }

    /// The job status mirrored alongside a completed advance out of this stage.
    pub fn status_after_advance(&self) -> Option<JobStatus> {
        match self {
            WorkflowStage::Field => Some(JobStatus::FieldComplete),
            WorkflowStage::Qa => Some(JobStatus::QaComplete),
            WorkflowStage::Md => Some(JobStatus::Completed),
            WorkflowStage::Complete => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub field_worker_id: Uuid,
    pub qa_id: Option<Uuid>,
    pub md_id: Option<Uuid>,
    pub current_stage: WorkflowStage,
    pub field_completed_at: Option<DateTime<Utc>>,
    pub qa_completed_at: Option<DateTime<Utc>>,
    pub md_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobAssignment {
    /// The user expected to perform the advance at the current stage.
    pub fn expected_actor(&self) -> Option<Uuid> {
        match self.current_stage {
            WorkflowStage::Field => Some(self.field_worker_id),
            WorkflowStage::Qa => self.qa_id,
            WorkflowStage::Md => self.md_id,
            WorkflowStage::Complete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order() {
        assert_eq!(WorkflowStage::Field.next(), Some(WorkflowStage::Qa));
        assert_eq!(WorkflowStage::Qa.next(), Some(WorkflowStage::Md));
        assert_eq!(WorkflowStage::Md.next(), Some(WorkflowStage::Complete));
        assert_eq!(WorkflowStage::Complete.next(), None);
    }

    #[test]
    fn each_stage_has_the_right_actor() {
        assert_eq!(WorkflowStage::Field.actor_role(), Some(UserRole::FieldTeam));
        assert_eq!(WorkflowStage::Qa.actor_role(), Some(UserRole::QaOfficer));
        assert_eq!(WorkflowStage::Md.actor_role(), Some(UserRole::Md));
        assert_eq!(WorkflowStage::Complete.actor_role(), None);
    }

    #[test]
    fn advance_mirrors_the_matching_job_status() {
        assert_eq!(
            WorkflowStage::Field.status_after_advance(),
            Some(JobStatus::FieldComplete)
        );
        assert_eq!(
            WorkflowStage::Qa.status_after_advance(),
            Some(JobStatus::QaComplete)
        );
        assert_eq!(
            WorkflowStage::Md.status_after_advance(),
            Some(JobStatus::Completed)
        );
        assert_eq!(WorkflowStage::Complete.status_after_advance(), None);
    }

    #[test]
    fn expected_actor_follows_current_stage() {
        let field_worker = Uuid::new_v4();
        let qa = Uuid::new_v4();
        let assignment = JobAssignment {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            field_worker_id: field_worker,
            qa_id: Some(qa),
            md_id: None,
            current_stage: WorkflowStage::Field,
            field_completed_at: None,
            qa_completed_at: None,
            md_completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(assignment.expected_actor(), Some(field_worker));

        let at_qa = JobAssignment {
            current_stage: WorkflowStage::Qa,
            ..assignment.clone()
        };
        assert_eq!(at_qa.expected_actor(), Some(qa));

        let at_md = JobAssignment {
            current_stage: WorkflowStage::Md,
            ..assignment
        };
        assert_eq!(at_md.expected_actor(), None);
    }
}
