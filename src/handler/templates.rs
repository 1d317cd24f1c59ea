use std::sync::Arc;

use axum::{
    extract::Path, response::IntoResponse, routing::get, Extension, Json, Router,
};

use crate::{error::HttpError, AppState};

pub fn templates_handler() -> Router {
    Router::new()
        .route("/", get(list_templates))
        .route("/:key", get(get_template))
}

pub async fn list_templates(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let templates = app_state.template_store.summaries();

    Ok(Json(serde_json::json!({
        "status": "success",
        "templates": templates,
    })))
}

pub async fn get_template(
    Path(key): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let template = app_state
        .template_store
        .get(&key)
        .ok_or_else(|| HttpError::not_found("Report template not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "template": template,
    })))
}
