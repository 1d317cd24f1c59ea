use super::sendmail::send_email;

/// Sent when an MD or QA officer approves a pending registration.
pub async fn send_welcome_email(
    to_email: &str,
    username: &str
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Welcome to ValuFlow";
    let template_path = "src/mail/templates/Welcome-email.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string())
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}

pub async fn send_forgot_password_email(
    to_email: &str,
    rest_link: &str,
    username: &str
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Rest your Password";
    let template_path = "src/mail/templates/RestPassword-email.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{rest_link}}".to_string(), rest_link.to_string())
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}

pub async fn send_job_completed_email(
    to_email: &str,
    username: &str,
    job_reference: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Valuation Job Completed";
    let template_path = "src/mail/templates/Job-Completion.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{job_reference}}".to_string(), job_reference.to_string()),
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}
