use axum::{extract::Query, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::views::{Dashboard, ViewName};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    tab: Option<ViewName>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Dashboard shell with the requested tab active
pub async fn dashboard(Query(params): Query<DashboardQuery>) -> Json<Dashboard> {
    Json(Dashboard::new(params.tab.unwrap_or_default()))
}
