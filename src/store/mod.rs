//! # 文档存储模块
//!
//! 翻译记录的持久化层。记录以三元组 (word, target_lang, source_lang) 为唯一键，
//! 只会在第一次成功翻译时写入一次，之后不会原地更新，只能按三元组显式删除。
//!
//! ## 模块组织
//!
//! - `schema` - 写入前的记录验证和 MongoDB `$jsonSchema` 验证器
//! - `mongo` - 基于 MongoDB 的实现
//! - `memory` - 进程内实现，语义与 MongoDB 版本一致

pub mod memory;
pub mod mongo;
pub mod schema;

pub use memory::MemoryWordStore;
pub use mongo::{MongoConfig, MongoWordStore};

use std::sync::Arc;

use async_trait::async_trait;

use crate::env::{EnvConfig, StoreBackend};
use crate::error::WordCacheResult;
use crate::model::{WordKey, WordQuery, WordRecord};

/// 翻译记录存储
#[async_trait]
pub trait WordStore: Send + Sync {
    /// 后端名称，用于日志和健康检查
    fn backend(&self) -> &'static str;

    /// 确保集合、验证器和唯一索引存在，可以重复调用
    async fn ensure_schema(&self) -> WordCacheResult<()>;

    /// 按三元组查找；`source_lang` 为 `None` 时匹配任意源语言
    async fn find_one(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<Option<WordRecord>>;

    /// 过滤、排序、分页后的记录列表
    async fn find_many(&self, query: &WordQuery) -> WordCacheResult<Vec<WordRecord>>;

    /// 插入新记录，三元组已存在时返回 `DuplicateKey`
    async fn insert(&self, record: &WordRecord) -> WordCacheResult<()>;

    /// 按三元组删除，返回是否删除了记录；记录不存在不是错误
    async fn delete(&self, key: &WordKey) -> WordCacheResult<bool>;

    /// 释放连接
    async fn close(&self) -> WordCacheResult<()>;
}

/// 按配置打开存储并确保集合结构存在
pub async fn open_store(config: &EnvConfig) -> WordCacheResult<Arc<dyn WordStore>> {
    let store: Arc<dyn WordStore> = match config.store {
        StoreBackend::MongoDb => {
            let mongo_config = MongoConfig::from_env(config)?;
            Arc::new(MongoWordStore::connect(&mongo_config).await?)
        }
        StoreBackend::Memory => Arc::new(MemoryWordStore::new()),
    };

    store.ensure_schema().await?;
    tracing::info!("存储已就绪: {}", store.backend());
    Ok(store)
}
