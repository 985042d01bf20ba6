use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    pub version: String,
    pub allowed_hosts: Vec<String>,
    pub timestamp: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        allowed_hosts: state.engine.allowlist().hosts().map(str::to_string).collect(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
