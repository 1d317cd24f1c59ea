use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::Job;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateJobDto {
    #[validate(length(min = 1, message = "Template key is required"))]
    pub template_key: String,

    pub client_info: serde_json::Value,

    pub asset_details: Option<serde_json::Value>,

    pub valuation_details: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct JobQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub status: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateJobDetailsDto {
    pub client_info: Option<serde_json::Value>,
    pub asset_details: Option<serde_json::Value>,
    pub valuation_details: Option<serde_json::Value>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvoiceJobDto {
    #[validate(range(min = 0.01, message = "Fee must be greater than zero"))]
    pub fee: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobData {
    pub job: Job,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponseDto {
    pub status: String,
    pub data: JobData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponseDto {
    pub status: String,
    pub jobs: Vec<Job>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusCountDto {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatsResponseDto {
    pub status: String,
    pub total: i64,
    pub counts: Vec<JobStatusCountDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_job_requires_template_key() {
        let dto = CreateJobDto {
            template_key: "".to_string(),
            client_info: json!({"client_name": "Acme Ltd"}),
            asset_details: None,
            valuation_details: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn invoice_fee_must_be_positive() {
        let dto = InvoiceJobDto { fee: 0.0 };
        assert!(dto.validate().is_err());

        let dto = InvoiceJobDto { fee: 250_000.0 };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn job_query_limit_is_capped() {
        let query = JobQueryDto {
            page: Some(1),
            limit: Some(200),
            status: None,
        };
        assert!(query.validate().is_err());
    }
}
