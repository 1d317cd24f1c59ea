// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Email service configurations
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from: String,
    // Report template / PDF asset locations
    pub template_dir: String,
    pub pdf_template_path: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        // Email service configurations (with defaults)
        let smtp_host = std::env::var("SMTP_HOST")
            .unwrap_or_else(|_| "localhost".to_string());
        let smtp_username = std::env::var("SMTP_USERNAME")
            .unwrap_or_else(|_| "".to_string());
        let smtp_password = std::env::var("SMTP_PASSWORD")
            .unwrap_or_else(|_| "".to_string());
        let smtp_from = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| "ValuFlow <no-reply@valuflow.local>".to_string());

        let template_dir = std::env::var("TEMPLATE_DIR")
            .unwrap_or_else(|_| "templates/reports".to_string());
        let pdf_template_path = std::env::var("PDF_TEMPLATE_PATH")
            .unwrap_or_else(|_| "templates/pdf/valuation_report.html".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port,
            smtp_host,
            smtp_username,
            smtp_password,
            smtp_from,
            template_dir,
            pdf_template_path,
        }
    }
}
