//! Web 路由处理器

pub mod health;
pub mod words;

pub use health::*;
pub use words::*;

use axum::{http::StatusCode, response::Json};

use crate::error::{helpers::log_error, WordCacheError};
use crate::web::types::ApiError;

/// 处理器的错误返回类型
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// 错误对应的 HTTP 状态码
pub fn status_for(error: &WordCacheError) -> StatusCode {
    match error {
        WordCacheError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WordCacheError::NotFound(_) => StatusCode::NOT_FOUND,
        WordCacheError::DuplicateKey(_) => StatusCode::CONFLICT,
        WordCacheError::Provider(_) => StatusCode::BAD_GATEWAY,
        WordCacheError::Database(_)
        | WordCacheError::Config(_)
        | WordCacheError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 创建API错误响应的辅助函数
fn create_api_error(
    status: StatusCode,
    error_code: &str,
    message: &str,
    request_id: String,
    details: Option<serde_json::Value>,
) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error_code: error_code.to_string(),
            message: message.to_string(),
            details,
            request_id,
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// 服务错误转换为 API 错误响应
pub fn error_response(error: WordCacheError, request_id: String) -> (StatusCode, Json<ApiError>) {
    log_error(&error);

    // 服务端错误不向调用方暴露内部细节
    let message = match &error {
        WordCacheError::Database(_) | WordCacheError::Config(_) | WordCacheError::Server(_) => {
            "internal server error".to_string()
        }
        other => other.to_string(),
    };

    create_api_error(
        status_for(&error),
        error.error_code(),
        &message,
        request_id,
        None,
    )
}

/// 请求体或查询参数解析失败
pub fn rejection_response(
    rejection: impl std::fmt::Display,
    request_id: String,
) -> (StatusCode, Json<ApiError>) {
    tracing::info!("请求参数无效: {}", rejection);
    create_api_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_ERROR",
        "invalid request parameters",
        request_id,
        Some(serde_json::Value::String(rejection.to_string())),
    )
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
