//! Web 服务器模块
//!
//! 为翻译缓存提供 HTTP 接口

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{WordCacheError, WordCacheResult};
use crate::service::TranslationService;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: Arc<TranslationService>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, service: Arc<TranslationService>) -> Self {
        Self { config, service }
    }

    /// 启动 Web 服务器，收到 Ctrl-C 或 SIGTERM 后停止接收新请求并返回
    pub async fn start(&self) -> WordCacheResult<()> {
        let app_state = Arc::new(AppState {
            service: self.service.clone(),
        });

        let app = create_router(app_state, &self.config);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address())
            .await
            .map_err(|e| WordCacheError::Server(format!("Failed to bind server: {}", e)))?;

        tracing::info!("Web 服务器启动: http://{}", self.config.listen_address());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WordCacheError::Server(format!("Server error: {}", e)))?;

        tracing::info!("Web 服务器已停止");
        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}

/// 根据配置创建 CORS 层
fn build_cors_layer(config: &WebConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any_origin() {
        return cors.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 来源: {}", origin);
                None
            }
        })
        .collect();
    tracing::info!("CORS 允许的来源: {:?}", config.cors_origins);
    cors.allow_origin(origins)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("收到停止信号，开始关闭");
}
