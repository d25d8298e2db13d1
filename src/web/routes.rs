//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/words", get(list_words).delete(delete_word))
        .route("/words/translate", post(translate_word))
        .route("/health", get(health))
}
