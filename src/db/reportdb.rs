// db/reportdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::reportmodel::{Report, ReportProgressEntry};

#[async_trait]
pub trait ReportExt {
    /// Creates the report row and marks the admin section complete in one
    /// transaction. Returns None if the job already has a report.
    async fn save_report(
        &self,
        job_id: Uuid,
        template_key: String,
        admin_data: serde_json::Value,
    ) -> Result<Option<Report>, sqlx::Error>;

    async fn get_report(&self, report_id: Uuid) -> Result<Option<Report>, sqlx::Error>;

    async fn get_report_by_job(&self, job_id: Uuid) -> Result<Option<Report>, sqlx::Error>;

    async fn update_field_data(
        &self,
        report_id: Uuid,
        field_data: serde_json::Value,
    ) -> Result<Report, sqlx::Error>;

    async fn update_qa_data(
        &self,
        report_id: Uuid,
        qa_data: serde_json::Value,
    ) -> Result<Report, sqlx::Error>;

    async fn get_report_progress(
        &self,
        report_id: Uuid,
    ) -> Result<Vec<ReportProgressEntry>, sqlx::Error>;
}

async fn mark_progress(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    report_id: Uuid,
    role: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO report_progress (report_id, role, completed, completed_at)
        VALUES ($1, $2, true, NOW())
        ON CONFLICT (report_id, role)
        DO UPDATE SET completed = true, completed_at = NOW()
        "#,
    )
    .bind(report_id)
    .bind(role)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl ReportExt for DBClient {
    async fn save_report(
        &self,
        job_id: Uuid,
        template_key: String,
        admin_data: serde_json::Value,
    ) -> Result<Option<Report>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (job_id, template_key, admin_data)
            VALUES ($1, $2, $3)
            ON CONFLICT (job_id) DO NOTHING
            RETURNING
                id, job_id, template_key, admin_data, field_data, qa_data,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(template_key)
        .bind(admin_data)
        .fetch_optional(&mut *tx)
        .await?;

        let report = match report {
            Some(report) => report,
            None => return Ok(None),
        };

        mark_progress(&mut tx, report.id, "admin").await?;

        tx.commit().await?;
        Ok(Some(report))
    }

    async fn get_report(&self, report_id: Uuid) -> Result<Option<Report>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, job_id, template_key, admin_data, field_data, qa_data,
                created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_report_by_job(&self, job_id: Uuid) -> Result<Option<Report>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, job_id, template_key, admin_data, field_data, qa_data,
                created_at, updated_at
            FROM reports
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_field_data(
        &self,
        report_id: Uuid,
        field_data: serde_json::Value,
    ) -> Result<Report, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET field_data = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, job_id, template_key, admin_data, field_data, qa_data,
                created_at, updated_at
            "#,
        )
        .bind(field_data)
        .bind(report_id)
        .fetch_one(&mut *tx)
        .await?;

        mark_progress(&mut tx, report.id, "field").await?;

        tx.commit().await?;
        Ok(report)
    }

    async fn update_qa_data(
        &self,
        report_id: Uuid,
        qa_data: serde_json::Value,
    ) -> Result<Report, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET qa_data = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, job_id, template_key, admin_data, field_data, qa_data,
                created_at, updated_at
            "#,
        )
        .bind(qa_data)
        .bind(report_id)
        .fetch_one(&mut *tx)
        .await?;

        mark_progress(&mut tx, report.id, "qa").await?;

        tx.commit().await?;
        Ok(report)
    }

    async fn get_report_progress(
        &self,
        report_id: Uuid,
    ) -> Result<Vec<ReportProgressEntry>, sqlx::Error> {
        sqlx::query_as::<_, ReportProgressEntry>(
            r#"
            SELECT id, report_id, role, completed, completed_at
            FROM report_progress
            WHERE report_id = $1
            ORDER BY role ASC
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
    }
}
