//! 健康检查

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::types::{AppState, HealthResponse};

/// 服务状态和存储后端
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        store: state.service.store().backend(),
        stats: state.service.stats(),
    })
}
