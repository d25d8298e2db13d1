//! 统一错误处理
//!
//! 提供结构化错误类型，以及错误到日志级别、HTTP 状态码的映射

use std::fmt;

use thiserror::Error;

use crate::env::EnvError;

/// 服务错误类型
#[derive(Error, Debug, Clone)]
pub enum WordCacheError {
    /// 输入验证错误（多个单词、分页越界、语言代码无效等）
    #[error("{0}")]
    Validation(String),

    /// 删除目标不存在
    #[error("{0}")]
    NotFound(String),

    /// 唯一索引冲突，只在并发写入同一三元组时出现
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// 翻译服务调用失败
    #[error("translation provider error: {0}")]
    Provider(String),

    /// 数据库错误
    #[error("database error: {0}")]
    Database(String),

    /// 配置错误
    #[error("configuration error: {0}")]
    Config(#[from] EnvError),

    /// 服务器启动或运行错误
    #[error("server error: {0}")]
    Server(String),
}

impl WordCacheError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WordCacheError::Validation(_) => ErrorSeverity::Info,
            WordCacheError::NotFound(_) => ErrorSeverity::Info,
            WordCacheError::DuplicateKey(_) => ErrorSeverity::Info,
            WordCacheError::Provider(_) => ErrorSeverity::Warning,
            WordCacheError::Database(_) => ErrorSeverity::Error,
            WordCacheError::Config(_) => ErrorSeverity::Critical,
            WordCacheError::Server(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否为调用方的错误
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WordCacheError::Validation(_) | WordCacheError::NotFound(_)
        )
    }

    /// 错误代码，用于 API 错误响应
    pub fn error_code(&self) -> &'static str {
        match self {
            WordCacheError::Validation(_) => "VALIDATION_ERROR",
            WordCacheError::NotFound(_) => "NOT_FOUND",
            WordCacheError::DuplicateKey(_) => "DUPLICATE_KEY",
            WordCacheError::Provider(_) => "PROVIDER_ERROR",
            WordCacheError::Database(_) => "DATABASE_ERROR",
            WordCacheError::Config(_) => "CONFIG_ERROR",
            WordCacheError::Server(_) => "SERVER_ERROR",
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<mongodb::error::Error> for WordCacheError {
    fn from(error: mongodb::error::Error) -> Self {
        WordCacheError::Database(error.to_string())
    }
}

impl From<bson::ser::Error> for WordCacheError {
    fn from(error: bson::ser::Error) -> Self {
        WordCacheError::Database(format!("BSON序列化错误: {}", error))
    }
}

impl From<bson::de::Error> for WordCacheError {
    fn from(error: bson::de::Error) -> Self {
        WordCacheError::Database(format!("BSON反序列化错误: {}", error))
    }
}

impl From<reqwest::Error> for WordCacheError {
    fn from(error: reqwest::Error) -> Self {
        // 请求地址里带着 API 密钥
        WordCacheError::Provider(error.without_url().to_string())
    }
}

impl From<tokio::task::JoinError> for WordCacheError {
    fn from(error: tokio::task::JoinError) -> Self {
        WordCacheError::Provider(format!("worker task failed: {}", error))
    }
}

/// 错误结果类型别名
pub type WordCacheResult<T> = Result<T, WordCacheError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &WordCacheError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("请求被拒绝: {}", error),
            ErrorSeverity::Warning => tracing::warn!("请求失败: {}", error),
            ErrorSeverity::Error => tracing::error!("请求错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("严重错误: {}", error),
        }
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> WordCacheError {
        WordCacheError::Validation(msg.to_string())
    }

    /// 创建翻译服务错误
    pub fn provider_error<T: fmt::Display>(msg: T) -> WordCacheError {
        WordCacheError::Provider(msg.to_string())
    }
}
