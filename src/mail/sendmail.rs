use std::fs;
use std::path::Path;
use serde_json::json;
use ammonia::{Builder, UrlRelative};
use regex::Regex;
use tracing::{error, info};
use chrono::Utc;

// HTML sanitizer for email content
fn sanitize_html(input: &str) -> String {
    let mut builder = Builder::default();

    // Allow safe HTML tags for emails
    builder
        .add_tags(&["p", "br", "strong", "em", "u", "span", "div", "a", "h1", "h2", "h3", "h4", "h5", "h6"])
        .add_generic_attributes(&["style", "class"])
        .add_tag_attributes("a", &["href", "target"])
        .add_tag_attributes("p", &["style"])
        .add_tag_attributes("div", &["style"])
        .add_tag_attributes("span", &["style"])
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None);

    builder.clean(input).to_string()
}

// Validate template path to prevent path traversal
fn validate_template_path(template_path: &str) -> Result<(), String> {
    let base_path = Path::new("src/mail/templates");
    let full_path = Path::new(template_path);

    if !full_path.starts_with(base_path) {
        return Err("Invalid template path: path traversal detected".to_string());
    }

    if !full_path.exists() {
        return Err("Template file not found".to_string());
    }

    if full_path.extension() != Some(std::ffi::OsStr::new("html")) {
        return Err("Template must be an HTML file".to_string());
    }

    Ok(())
}

fn validate_email(email: &str) -> Result<(), String> {
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).map_err(|_| "Invalid regex pattern".to_string())?;

    if email_regex.is_match(email) {
        Ok(())
    } else {
        Err("Invalid email address format".to_string())
    }
}

// Audit logging for email operations
fn log_email_operation(to_email: &str, subject: &str, template_path: &str, success: bool, error: Option<&str>) {
    let log_entry = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "operation": "email_send",
        "to_email": to_email,
        "subject": subject,
        "template": template_path,
        "success": success,
        "error": error
    });

    if success {
        info!("Email sent successfully: {}", log_entry);
    } else {
        error!("Email send failed: {}", log_entry);
    }
}

pub async fn send_email(
    to_email: &str,
    subject: &str,
    template_path: &str,
    placeholders: &[(String, String)]
) -> Result<(), Box<dyn std::error::Error>> {
    if to_email.is_empty() {
        return Err("Email recipient cannot be empty".into());
    }

    validate_email(to_email).map_err(|e| e.to_string())?;
    validate_template_path(template_path).map_err(|e| e.to_string())?;

    let mut html_template = match fs::read_to_string(template_path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read email template {}: {}", template_path, e);
            log_email_operation(to_email, subject, template_path, false, Some("template read failed"));
            return Err(format!("Template not found: {}", template_path).into());
        }
    };

    // Sanitize all placeholder values to prevent HTML injection
    let sanitized_placeholders: Vec<(String, String)> = placeholders
        .iter()
        .map(|(key, value)| {
            let sanitized_value = sanitize_html(value);
            (key.clone(), sanitized_value)
        })
        .collect();

    for (key, value) in &sanitized_placeholders {
        html_template = html_template.replace(key, value);
    }

    match send_via_smtp(to_email, subject, &html_template).await {
        Ok(_) => {
            log_email_operation(to_email, subject, template_path, true, None);
            Ok(())
        }
        Err(e) => {
            log_email_operation(to_email, subject, template_path, false, Some(&e.to_string()));
            Err(e)
        }
    }
}

async fn send_via_smtp(
    to_email: &str,
    subject: &str,
    html_body: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use lettre::{
        Message, SmtpTransport, Transport,
        message::{header::ContentType, MultiPart, SinglePart},
        transport::smtp::authentication::Credentials,
    };

    let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
    let smtp_username = std::env::var("SMTP_USERNAME").unwrap_or_else(|_| "".to_string());
    let smtp_password = std::env::var("SMTP_PASSWORD").unwrap_or_else(|_| "".to_string());
    let smtp_port: u16 = std::env::var("SMTP_PORT")
        .unwrap_or_else(|_| "587".to_string())
        .parse()
        .unwrap_or(587);

    let from_email = std::env::var("SMTP_FROM")
        .unwrap_or_else(|_| "ValuFlow <noreply@valuflow.app>".to_string());

    let email = Message::builder()
        .from(from_email.parse()?)
        .to(to_email.parse()?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string())
                )
        )?;

    let creds = Credentials::new(smtp_username, smtp_password);
    let mailer = SmtpTransport::relay(&smtp_host)?
        .port(smtp_port)
        .credentials(creds)
        .build();

    match mailer.send(&email) {
        Ok(_) => {
            info!("Email sent successfully via SMTP to {}", to_email);
            Ok(())
        }
        Err(e) => {
            error!("SMTP send failed: {}", e);
            Err(format!("SMTP send failed: {}", e).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("test@.com").is_err());
    }

    #[test]
    fn test_html_sanitization() {
        let input = "<script>alert('xss')</script><p>Safe content</p>";
        let sanitized = sanitize_html(input);
        assert!(!sanitized.contains("<script>"));
        assert!(sanitized.contains("<p>Safe content</p>"));
    }

    #[test]
    fn test_template_path_validation() {
        assert!(validate_template_path("src/mail/templates/Welcome-email.html").is_ok());
        assert!(validate_template_path("../../../etc/passwd").is_err());
        assert!(validate_template_path("src/mail/templates/../config.txt").is_err());
    }
}
