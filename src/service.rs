//! 读穿缓存服务
//!
//! 先查存储，未命中时调用翻译服务并把结果写回存储。并发请求同一个三元组时，
//! 唯一索引保证只留下一条记录，输掉竞争的一方读取已经写入的记录返回。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{WordCacheError, WordCacheResult};
use crate::model::{validate_lang_code, WordKey, WordQuery, WordRecord};
use crate::provider::TranslationProvider;
use crate::store::WordStore;
use crate::validation::{normalize_word, validate_key};

/// 服务统计
#[derive(Debug, Default)]
struct ServiceStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    provider_failures: AtomicU64,
    duplicate_inserts: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_failures: u64,
    pub duplicate_inserts: u64,
}

impl ServiceStats {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            duplicate_inserts: self.duplicate_inserts.load(Ordering::Relaxed),
        }
    }
}

/// 翻译缓存服务
pub struct TranslationService {
    store: Arc<dyn WordStore>,
    provider: Arc<dyn TranslationProvider>,
    stats: ServiceStats,
}

impl TranslationService {
    pub fn new(store: Arc<dyn WordStore>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            store,
            provider,
            stats: ServiceStats::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn WordStore> {
        &self.store
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// 查询翻译，未命中时调用翻译服务并缓存结果
    pub async fn translate(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord> {
        let word = normalize_word(word)?;
        validate_lang_code(target_lang)?;
        if let Some(source_lang) = source_lang {
            validate_lang_code(source_lang)?;
        }

        if let Some(record) = self.store.find_one(&word, target_lang, source_lang).await? {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("缓存命中: {}", record.key());
            return Ok(record);
        }

        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("缓存未命中: {} -> {}", word, target_lang);

        let fetched = match self.provider.translate(&word, target_lang, source_lang).await {
            Ok(record) => record,
            Err(e) => {
                self.stats.provider_failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        match self.store.insert(&fetched).await {
            Ok(()) => {
                tracing::info!("已缓存新翻译: {} ({})", fetched.key(), self.provider.name());
                Ok(fetched)
            }
            Err(WordCacheError::DuplicateKey(key)) => {
                self.stats.duplicate_inserts.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("并发写入冲突，读取已有记录: {}", key);
                let existing = self
                    .store
                    .find_one(&fetched.word, &fetched.target_lang, Some(&fetched.source_lang))
                    .await?;
                Ok(existing.unwrap_or(fetched))
            }
            Err(e) => Err(e),
        }
    }

    /// 列出记录
    pub async fn list_words(&self, query: &WordQuery) -> WordCacheResult<Vec<WordRecord>> {
        query.validate()?;
        self.store.find_many(query).await
    }

    /// 按三元组删除记录，不存在时返回 `NotFound`
    pub async fn delete_word(&self, key: &WordKey) -> WordCacheResult<()> {
        validate_key(key)?;

        if self.store.delete(key).await? {
            tracing::info!("已删除: {}", key);
            Ok(())
        } else {
            Err(WordCacheError::NotFound(format!("word not found: {}", key)))
        }
    }
}
