//! # Word Cache Library
//!
//! 单词翻译的读穿缓存：先查文档存储，未命中时调用外部翻译服务并把结果存下来供以后复用。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量配置
//! - `error` - 统一错误类型
//! - `model` - 翻译记录、唯一键和列表查询
//! - `validation` - 请求输入验证
//! - `store` - 文档存储（MongoDB 和进程内实现）
//! - `provider` - 外部翻译服务
//! - `service` - 读穿缓存服务
//! - `web` - HTTP 接口

pub mod env;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;
pub mod validation;
pub mod web;

// Re-export commonly used items for convenience
pub use error::{WordCacheError, WordCacheResult};
pub use model::{SortOrder, WordKey, WordQuery, WordRecord};
pub use service::TranslationService;
