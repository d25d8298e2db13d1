// 集成测试公共模块
//
// 提供测试用的翻译服务、存储包装和数据辅助函数

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use word_cache::error::{WordCacheError, WordCacheResult};
use word_cache::model::{WordKey, WordQuery, WordRecord};
use word_cache::provider::TranslationProvider;
use word_cache::store::{MemoryWordStore, WordStore};
use word_cache::TranslationService;

/// 记录调用次数的翻译服务
///
/// 译文为 `{word}-{target_lang}`，未给出源语言时“检测”为 `en`
#[derive(Default)]
pub struct CountingProvider {
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn translate(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(translated(word, target_lang, source_lang.unwrap_or("en")))
    }
}

/// 总是失败的翻译服务
#[derive(Default)]
pub struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn translate(
        &self,
        _word: &str,
        _target_lang: &str,
        _source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WordCacheError::Provider("HTTP 403: quota exceeded".to_string()))
    }
}

/// 第一次查找总是未命中的存储
///
/// 模拟另一个请求在本次查找之后、写入之前抢先写入了同一个三元组
pub struct StaleFirstReadStore {
    inner: Arc<MemoryWordStore>,
    stale: AtomicBool,
}

impl StaleFirstReadStore {
    pub fn new(inner: Arc<MemoryWordStore>) -> Self {
        Self {
            inner,
            stale: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl WordStore for StaleFirstReadStore {
    fn backend(&self) -> &'static str {
        "stale-memory"
    }

    async fn ensure_schema(&self) -> WordCacheResult<()> {
        self.inner.ensure_schema().await
    }

    async fn find_one(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<Option<WordRecord>> {
        if self.stale.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_one(word, target_lang, source_lang).await
    }

    async fn find_many(&self, query: &WordQuery) -> WordCacheResult<Vec<WordRecord>> {
        self.inner.find_many(query).await
    }

    async fn insert(&self, record: &WordRecord) -> WordCacheResult<()> {
        self.inner.insert(record).await
    }

    async fn delete(&self, key: &WordKey) -> WordCacheResult<bool> {
        self.inner.delete(key).await
    }

    async fn close(&self) -> WordCacheResult<()> {
        self.inner.close().await
    }
}

/// 翻译服务会返回的记录
pub fn translated(word: &str, target_lang: &str, source_lang: &str) -> WordRecord {
    let translation = format!("{}-{}", word, target_lang);
    WordRecord {
        definitions: vec![word.to_string(), translation.clone()],
        synonyms: vec![word.to_string(), translation.clone()],
        translations: vec![translation],
        ..WordRecord::new(word, target_lang, source_lang)
    }
}

/// 基于进程内存储的服务
pub fn memory_service<P>(provider: Arc<P>) -> (Arc<TranslationService>, Arc<MemoryWordStore>)
where
    P: TranslationProvider + 'static,
{
    let store = Arc::new(MemoryWordStore::new());
    let service = Arc::new(TranslationService::new(store.clone(), provider));
    (service, store)
}

/// 写入一组 en -> fr 的记录
pub async fn seed(store: &MemoryWordStore, words: &[&str]) {
    for word in words {
        store
            .insert(&translated(word, "fr", "en"))
            .await
            .expect("seed insert");
    }
}
