mod models;
mod service;
mod config;
mod dtos;
mod error;
mod db;
mod utils;
mod middleware;
mod mail;
mod handler;
mod routes;

use std::sync::Arc;

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use crate::db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use service::{
    notification_service::NotificationService,
    pdf_service::PdfService,
    template_service::TemplateStore,
    workflow_service::WorkflowService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub template_store: Arc<TemplateStore>,
    // Services
    pub workflow_service: Arc<WorkflowService>,
    pub notification_service: Arc<NotificationService>,
    pub pdf_service: Arc<PdfService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config, template_store: TemplateStore) -> Self {
        let db_client_arc = Arc::new(db_client);

        // Initialize all services
        let notification_service = Arc::new(NotificationService::new(db_client_arc.clone()));
        let workflow_service = Arc::new(WorkflowService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let pdf_service = Arc::new(PdfService::new(config.pdf_template_path.clone()));

        Self {
            env: config,
            db_client: db_client_arc,
            template_store: Arc::new(template_store),
            workflow_service,
            notification_service,
            pdf_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
            .max_connections(20)
            .min_connections(5)
            .connect(&config.database_url)
            .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");

            // Store max connections for monitoring
            let max_connections = 20;

            // Start a background task to monitor pool health
            let pool_for_monitoring = pool.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
                loop {
                    interval.tick().await;
                    let size = pool_for_monitoring.size();
                    let idle = pool_for_monitoring.num_idle();
                    tracing::debug!("🔍 Pool Status - Active: {}, Idle: {}, Total: {}",
                        size - idle as u32, idle, size);

                    // Warning if pool is getting full
                    if size >= max_connections * 8 / 10 {
                        tracing::warn!("⚠️  Connection pool at 80% capacity! Consider increasing max_connections");
                    }
                }
            });

            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let template_store = match TemplateStore::load(&config.template_dir) {
        Ok(store) => store,
        Err(err) => {
            println!("🔥 Failed to load report templates: {}", err);
            std::process::exit(1);
        }
    };

    let allowed_origins = vec![
        config.app_url.parse::<HeaderValue>().unwrap(),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let db_client = DBClient::new(pool);
    let app_state = Arc::new(AppState::new(db_client, config.clone(), template_store));

    let app = create_router(app_state.clone()).layer(cors);

    println!(
        "🚀 Server is running on http://localhost:{}",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
