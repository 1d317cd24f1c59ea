// services/pdf_service.rs
use std::fs;

use headless_chrome::{types::PrintToPdfOptions, Browser};

use crate::{
    models::{jobmodel::Job, reportmodel::Report},
    service::error::ServiceError,
};

/// Renders a finished report into a PDF. One synchronous Chrome print per
/// request; nothing is cached or queued.
#[derive(Debug, Clone)]
pub struct PdfService {
    template_path: String,
}

impl PdfService {
    pub fn new(template_path: impl Into<String>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    pub async fn render_report_pdf(
        &self,
        job: &Job,
        report: &Report,
    ) -> Result<Vec<u8>, ServiceError> {
        let html = self.build_html(job, report)?;

        // Chrome drives a real subprocess, keep it off the async workers.
        let bytes = tokio::task::spawn_blocking(move || print_pdf(&html))
            .await
            .map_err(|e| ServiceError::Other(format!("PDF render task failed: {}", e)))?
            .map_err(ServiceError::Other)?;

        tracing::info!(
            "Rendered PDF for job {} ({} bytes)",
            job.reference,
            bytes.len()
        );

        Ok(bytes)
    }

    fn build_html(&self, job: &Job, report: &Report) -> Result<String, ServiceError> {
        let mut html = fs::read_to_string(&self.template_path).map_err(|e| {
            ServiceError::Other(format!(
                "Failed to read PDF template {}: {}",
                self.template_path, e
            ))
        })?;

        let generated_at = chrono::Utc::now().format("%B %d, %Y").to_string();

        let placeholders = vec![
            ("{{reference}}".to_string(), ammonia::clean(&job.reference)),
            ("{{status}}".to_string(), ammonia::clean(&job.status)),
            (
                "{{template_key}}".to_string(),
                ammonia::clean(&report.template_key),
            ),
            ("{{generated_at}}".to_string(), generated_at),
            (
                "{{client_rows}}".to_string(),
                render_json_rows(&job.client_info),
            ),
            (
                "{{asset_rows}}".to_string(),
                render_json_rows(&job.asset_details),
            ),
            (
                "{{valuation_rows}}".to_string(),
                render_json_rows(&job.valuation_details),
            ),
            (
                "{{admin_rows}}".to_string(),
                report
                    .admin_data
                    .as_ref()
                    .map(render_json_rows)
                    .unwrap_or_default(),
            ),
            (
                "{{field_rows}}".to_string(),
                report
                    .field_data
                    .as_ref()
                    .map(render_json_rows)
                    .unwrap_or_default(),
            ),
            (
                "{{qa_rows}}".to_string(),
                report
                    .qa_data
                    .as_ref()
                    .map(render_json_rows)
                    .unwrap_or_default(),
            ),
        ];

        for (key, value) in &placeholders {
            html = html.replace(key, value);
        }

        Ok(html)
    }
}

/// Turns a JSON object into sanitized table rows. Submitted report data is
/// client-controlled, so every interpolated string goes through ammonia.
fn render_json_rows(data: &serde_json::Value) -> String {
    match data {
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                format!(
                    "<tr><th>{}</th><td>{}</td></tr>",
                    ammonia::clean(&key.replace('_', " ")),
                    ammonia::clean(&render_json_value(value))
                )
            })
            .collect(),
        other => format!(
            "<tr><td colspan=\"2\">{}</td></tr>",
            ammonia::clean(&render_json_value(other))
        ),
    }
}

fn render_json_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(render_json_value)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
        other => other.to_string(),
    }
}

fn print_pdf(html: &str) -> Result<Vec<u8>, String> {
    let browser = Browser::default().map_err(|e| format!("Failed to launch Chrome: {}", e))?;

    let tab = browser
        .new_tab()
        .map_err(|e| format!("Failed to open tab: {}", e))?;

    let data_url = format!(
        "data:text/html;charset=utf-8,{}",
        urlencoding::encode(html)
    );

    tab.navigate_to(&data_url)
        .map_err(|e| format!("Failed to load report HTML: {}", e))?
        .wait_until_navigated()
        .map_err(|e| format!("Report HTML never finished loading: {}", e))?;

    let options = PrintToPdfOptions {
        print_background: Some(true),
        ..Default::default()
    };

    tab.print_to_pdf(Some(options))
        .map_err(|e| format!("Chrome print failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_renders_as_table_rows() {
        let data = json!({
            "client_name": "Acme Ltd",
            "plot_size": 450,
            "amenities": ["water", "power"]
        });

        let rows = render_json_rows(&data);
        assert!(rows.contains("<th>client name</th>"));
        assert!(rows.contains("<td>Acme Ltd</td>"));
        assert!(rows.contains("<td>450</td>"));
        assert!(rows.contains("water, power"));
    }

    #[test]
    fn interpolated_strings_are_sanitized() {
        let data = json!({
            "client_name": "<script>alert('x')</script>Acme"
        });

        let rows = render_json_rows(&data);
        assert!(!rows.contains("<script>"));
        assert!(rows.contains("Acme"));
    }

    #[test]
    fn null_renders_empty() {
        assert_eq!(render_json_value(&serde_json::Value::Null), "");
    }
}
