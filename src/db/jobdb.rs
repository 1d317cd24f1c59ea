// db/jobdb.rs
use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::jobmodel::Job;

#[derive(Debug, sqlx::FromRow)]
pub struct JobStatusCount {
    pub status: String,
    pub count: i64,
}

#[async_trait]
pub trait JobExt {
    async fn save_job(
        &self,
        reference: String,
        created_by: Uuid,
        template_key: String,
        client_info: serde_json::Value,
        asset_details: serde_json::Value,
        valuation_details: serde_json::Value,
        chain: serde_json::Value,
    ) -> Result<Job, sqlx::Error>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error>;

    async fn get_job_by_reference(&self, reference: &str) -> Result<Option<Job>, sqlx::Error>;

    async fn get_jobs(
        &self,
        page: u32,
        limit: usize,
        status: Option<&str>,
    ) -> Result<Vec<Job>, sqlx::Error>;

    async fn get_job_count(&self, status: Option<&str>) -> Result<i64, sqlx::Error>;

    async fn update_job_details(
        &self,
        job_id: Uuid,
        client_info: serde_json::Value,
        asset_details: serde_json::Value,
        valuation_details: serde_json::Value,
    ) -> Result<Job, sqlx::Error>;

    async fn mark_job_invoiced(
        &self,
        job_id: Uuid,
        fee: BigDecimal,
        chain_entry: serde_json::Value,
    ) -> Result<Job, sqlx::Error>;

    async fn update_job_status(&self, job_id: Uuid, status: &str) -> Result<Job, sqlx::Error>;

    async fn get_job_status_counts(&self) -> Result<Vec<JobStatusCount>, sqlx::Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn save_job(
        &self,
        reference: String,
        created_by: Uuid,
        template_key: String,
        client_info: serde_json::Value,
        asset_details: serde_json::Value,
        valuation_details: serde_json::Value,
        chain: serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (reference, created_by, template_key, client_info, asset_details, valuation_details, chain)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            "#,
        )
        .bind(reference)
        .bind(created_by)
        .bind(template_key)
        .bind(client_info)
        .bind(asset_details)
        .bind(valuation_details)
        .bind(chain)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_job_by_reference(&self, reference: &str) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            FROM jobs
            WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_jobs(
        &self,
        page: u32,
        limit: usize,
        status: Option<&str>,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        if let Some(status) = status {
            sqlx::query_as::<_, Job>(
                r#"
                SELECT
                    id, reference, created_by, template_key,
                    client_info, asset_details, valuation_details,
                    status, chain, fee,
                    created_at, updated_at
                FROM jobs
                WHERE status = $1
                ORDER BY created_at DESC LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Job>(
                r#"
                SELECT
                    id, reference, created_by, template_key,
                    client_info, asset_details, valuation_details,
                    status, chain, fee,
                    created_at, updated_at
                FROM jobs
                ORDER BY created_at DESC LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
        }
    }

    async fn get_job_count(&self, status: Option<&str>) -> Result<i64, sqlx::Error> {
        let count: i64 = if let Some(status) = status {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM jobs WHERE status = $1"#)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM jobs"#)
                .fetch_one(&self.pool)
                .await?
        };

        Ok(count)
    }

    async fn update_job_details(
        &self,
        job_id: Uuid,
        client_info: serde_json::Value,
        asset_details: serde_json::Value,
        valuation_details: serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET client_info = $1,
                asset_details = $2,
                valuation_details = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            "#,
        )
        .bind(client_info)
        .bind(asset_details)
        .bind(valuation_details)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_job_invoiced(
        &self,
        job_id: Uuid,
        fee: BigDecimal,
        chain_entry: serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'invoiced',
                fee = $1,
                chain = chain || $2::jsonb,
                updated_at = NOW()
            WHERE id = $3
            RETURNING
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            "#,
        )
        .bind(fee)
        .bind(chain_entry)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_job_status(&self, job_id: Uuid, status: &str) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING
                id, reference, created_by, template_key,
                client_info, asset_details, valuation_details,
                status, chain, fee,
                created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_status_counts(&self) -> Result<Vec<JobStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, JobStatusCount>(
            r#"
            SELECT status, COUNT(*) as count
            FROM jobs
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
