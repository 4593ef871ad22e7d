use crate::{
    error::AppError,
    integrations::IntegrationItem,
    integrations::hubspot::{CallbackParams, fetch_items},
    server::Server,
};
use axum::{
    Json, Router,
    extract::{Form, Query, State},
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;

/// Rendered to the popup window after a successful callback; its only
/// behavior is closing itself. The credential is picked up later through the
/// credentials endpoint.
const CLOSE_WINDOW_PAGE: &str = "\
<html>
    <script>
        window.close();
    </script>
</html>";

#[derive(Deserialize)]
pub struct AccountForm {
    pub user_id: String,
    pub org_id: String,
}

#[derive(Deserialize)]
pub struct LoadForm {
    pub credentials: String,
}

pub fn create_integration_routes() -> Router<Server> {
    Router::new()
        .route("/integrations/hubspot/authorize", post(authorize_handler))
        .route("/integrations/hubspot/oauth2callback", get(callback_handler))
        .route(
            "/integrations/hubspot/credentials",
            post(credentials_handler),
        )
        .route("/integrations/hubspot/load", post(load_handler))
}

pub async fn authorize_handler(
    State(server): State<Server>,
    Form(form): Form<AccountForm>,
) -> Result<Json<String>, AppError> {
    let url = server
        .hubspot
        .begin_authorization(&form.user_id, &form.org_id)
        .await?;
    Ok(Json(url))
}

pub async fn callback_handler(
    State(server): State<Server>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<&'static str>, AppError> {
    server.hubspot.handle_callback(params).await?;
    Ok(Html(CLOSE_WINDOW_PAGE))
}

pub async fn credentials_handler(
    State(server): State<Server>,
    Form(form): Form<AccountForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payload = server
        .credentials
        .get_credentials(&form.user_id, &form.org_id)
        .await?;
    Ok(Json(payload))
}

pub async fn load_handler(
    State(server): State<Server>,
    Form(form): Form<LoadForm>,
) -> Result<Json<Vec<IntegrationItem>>, AppError> {
    let config = server.config.hubspot.clone();
    // The contacts fetch is blocking I/O; keep it off the async scheduler.
    let items = tokio::task::spawn_blocking(move || fetch_items(&config, &form.credentials))
        .await
        .map_err(|e| AppError::Internal(format!("import task failed: {e}")))??;
    Ok(Json(items))
}
