// db/assignmentdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::assignmentmodel::JobAssignment;
use crate::models::usermodel::UserRole;

#[async_trait]
pub trait AssignmentExt {
    /// Inserts the assignment row and mirrors the job status in one
    /// transaction. Returns None if the job already has an assignment.
    async fn create_assignment(
        &self,
        job_id: Uuid,
        field_worker_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error>;

    async fn get_assignment_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobAssignment>, sqlx::Error>;

    async fn get_active_assignments(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<JobAssignment>, sqlx::Error>;

    /// Advance out of the field stage. The UPDATE is guarded on
    /// `current_stage = 'field'`; a None result means another request
    /// advanced the assignment first.
    async fn complete_field_stage(
        &self,
        job_id: Uuid,
        qa_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error>;

    async fn complete_qa_stage(
        &self,
        job_id: Uuid,
        md_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error>;

    async fn complete_md_stage(&self, job_id: Uuid)
        -> Result<Option<JobAssignment>, sqlx::Error>;

    /// QA officer with the fewest assignments currently waiting at the QA
    /// stage. Only approved officers are considered.
    async fn least_loaded_qa_officer(&self) -> Result<Option<Uuid>, sqlx::Error>;

    async fn least_loaded_md(&self) -> Result<Option<Uuid>, sqlx::Error>;
}

#[async_trait]
impl AssignmentExt for DBClient {
    async fn create_assignment(
        &self,
        job_id: Uuid,
        field_worker_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, JobAssignment>(
            r#"
            INSERT INTO job_assignments (job_id, field_worker_id)
            VALUES ($1, $2)
            ON CONFLICT (job_id) DO NOTHING
            RETURNING
                id, job_id, field_worker_id, qa_id, md_id, current_stage,
                field_completed_at, qa_completed_at, md_completed_at,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(field_worker_id)
        .fetch_optional(&mut *tx)
        .await?;

        let assignment = match assignment {
            Some(assignment) => assignment,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'assigned',
                chain = chain || $1::jsonb,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(chain_entry)
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    async fn get_assignment_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        sqlx::query_as::<_, JobAssignment>(
            r#"
            SELECT
                id, job_id, field_worker_id, qa_id, md_id, current_stage,
                field_completed_at, qa_completed_at, md_completed_at,
                created_at, updated_at
            FROM job_assignments
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_active_assignments(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<JobAssignment>, sqlx::Error> {
        match role {
            UserRole::FieldTeam => {
                sqlx::query_as::<_, JobAssignment>(
                    r#"
                    SELECT
                        id, job_id, field_worker_id, qa_id, md_id, current_stage,
                        field_completed_at, qa_completed_at, md_completed_at,
                        created_at, updated_at
                    FROM job_assignments
                    WHERE field_worker_id = $1 AND current_stage = 'field'::workflow_stage
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            UserRole::QaOfficer => {
                sqlx::query_as::<_, JobAssignment>(
                    r#"
                    SELECT
                        id, job_id, field_worker_id, qa_id, md_id, current_stage,
                        field_completed_at, qa_completed_at, md_completed_at,
                        created_at, updated_at
                    FROM job_assignments
                    WHERE qa_id = $1 AND current_stage = 'qa'::workflow_stage
                    ORDER BY field_completed_at ASC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            UserRole::Md => {
                sqlx::query_as::<_, JobAssignment>(
                    r#"
                    SELECT
                        id, job_id, field_worker_id, qa_id, md_id, current_stage,
                        field_completed_at, qa_completed_at, md_completed_at,
                        created_at, updated_at
                    FROM job_assignments
                    WHERE md_id = $1 AND current_stage = 'md'::workflow_stage
                    ORDER BY qa_completed_at ASC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            UserRole::Admin | UserRole::Accounts => Ok(Vec::new()),
        }
    }

    async fn complete_field_stage(
        &self,
        job_id: Uuid,
        qa_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, JobAssignment>(
            r#"
            UPDATE job_assignments
            SET current_stage = 'qa'::workflow_stage,
                qa_id = $1,
                field_completed_at = NOW(),
                updated_at = NOW()
            WHERE job_id = $2 AND current_stage = 'field'::workflow_stage
            RETURNING
                id, job_id, field_worker_id, qa_id, md_id, current_stage,
                field_completed_at, qa_completed_at, md_completed_at,
                created_at, updated_at
            "#,
        )
        .bind(qa_id)
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?;

        let assignment = match assignment {
            Some(assignment) => assignment,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'field_complete',
                chain = chain || $1::jsonb,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(chain_entry)
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    async fn complete_qa_stage(
        &self,
        job_id: Uuid,
        md_id: Uuid,
        chain_entry: serde_json::Value,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, JobAssignment>(
            r#"
            UPDATE job_assignments
            SET current_stage = 'md'::workflow_stage,
                md_id = $1,
                qa_completed_at = NOW(),
                updated_at = NOW()
            WHERE job_id = $2 AND current_stage = 'qa'::workflow_stage
            RETURNING
                id, job_id, field_worker_id, qa_id, md_id, current_stage,
                field_completed_at, qa_completed_at, md_completed_at,
                created_at, updated_at
            "#,
        )
        .bind(md_id)
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?;

        let assignment = match assignment {
            Some(assignment) => assignment,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'qa_complete',
                chain = chain || $1::jsonb,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(chain_entry)
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    async fn complete_md_stage(
        &self,
        job_id: Uuid,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let assignment = sqlx::query_as::<_, JobAssignment>(
            r#"
            UPDATE job_assignments
            SET current_stage = 'complete'::workflow_stage,
                md_completed_at = NOW(),
                updated_at = NOW()
            WHERE job_id = $1 AND current_stage = 'md'::workflow_stage
            RETURNING
                id, job_id, field_worker_id, qa_id, md_id, current_stage,
                field_completed_at, qa_completed_at, md_completed_at,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?;

        let assignment = match assignment {
            Some(assignment) => assignment,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(assignment))
    }

    async fn least_loaded_qa_officer(&self) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT u.id
            FROM users u
            LEFT JOIN job_assignments a
                ON a.qa_id = u.id AND a.current_stage = 'qa'::workflow_stage
            WHERE u.role = 'qa_officer'::user_role AND u.approved = true
            GROUP BY u.id
            ORDER BY COUNT(a.id) ASC, u.id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    async fn least_loaded_md(&self) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT u.id
            FROM users u
            LEFT JOIN job_assignments a
                ON a.md_id = u.id AND a.current_stage = 'md'::workflow_stage
            WHERE u.role = 'md'::user_role AND u.approved = true
            GROUP BY u.id
            ORDER BY COUNT(a.id) ASC, u.id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }
}
