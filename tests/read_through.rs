//! 读穿缓存集成测试
//!
//! 测试查找、写回、并发写入冲突和删除后的重新获取

use std::sync::Arc;
use std::time::Duration;

use word_cache::model::WordKey;
use word_cache::store::{MemoryWordStore, WordStore};
use word_cache::{TranslationService, WordCacheError};

mod common;

use common::{
    memory_service, translated, CountingProvider, FailingProvider, StaleFirstReadStore,
};

/// 同一个三元组只调用一次翻译服务
#[tokio::test]
async fn test_repeated_lookup_hits_cache() {
    let provider = Arc::new(CountingProvider::new());
    let (service, store) = memory_service(provider.clone());

    let first = service.translate("time", "it", Some("en")).await.unwrap();
    let second = service.translate("time", "it", Some("en")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.translations, vec!["time-it"]);
    assert_eq!(provider.calls(), 1);
    assert_eq!(store.len().await, 1);

    let stats = service.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
}

/// 未给出源语言时匹配任意源语言的已有记录
#[tokio::test]
async fn test_lookup_without_source_lang() {
    let provider = Arc::new(CountingProvider::new());
    let (service, _store) = memory_service(provider.clone());

    let detected = service.translate("Zeit", "en", None).await.unwrap();
    assert_eq!(detected.source_lang, "en");

    service.translate("Zeit", "en", None).await.unwrap();
    service.translate("Zeit", "en", Some("en")).await.unwrap();
    assert_eq!(provider.calls(), 1);
}

/// 输入在访问存储和翻译服务之前验证
#[tokio::test]
async fn test_validation_happens_first() {
    let provider = Arc::new(CountingProvider::new());
    let (service, store) = memory_service(provider.clone());

    match service.translate("hello world", "it", None).await {
        Err(WordCacheError::Validation(msg)) => assert_eq!(msg, "only one word is allowed"),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(service.translate("time", "i t", None).await.is_err());
    assert!(service.translate("time", "it", Some("")).await.is_err());

    assert_eq!(provider.calls(), 0);
    assert!(store.is_empty().await);
}

/// 首尾空白被去掉后作为同一个单词
#[tokio::test]
async fn test_word_is_trimmed() {
    let provider = Arc::new(CountingProvider::new());
    let (service, _store) = memory_service(provider.clone());

    let record = service.translate("  time ", "it", Some("en")).await.unwrap();
    assert_eq!(record.word, "time");
    service.translate("time", "it", Some("en")).await.unwrap();
    assert_eq!(provider.calls(), 1);
}

/// 翻译失败时不写入任何记录
#[tokio::test]
async fn test_provider_failure_is_not_cached() {
    let provider = Arc::new(FailingProvider::default());
    let (service, store) = memory_service(provider.clone());

    for _ in 0..2 {
        let err = service.translate("time", "it", Some("en")).await.unwrap_err();
        assert!(matches!(err, WordCacheError::Provider(_)));
    }

    assert_eq!(provider.calls(), 2);
    assert!(store.is_empty().await);
    assert_eq!(service.stats().provider_failures, 2);
}

/// 写入冲突时返回已经存在的记录
#[tokio::test]
async fn test_lost_race_returns_stored_record() {
    let inner = Arc::new(MemoryWordStore::new());
    let mut winner = translated("time", "it", "en");
    winner.translations = vec!["tempo".to_string()];
    inner.insert(&winner).await.unwrap();

    let provider = Arc::new(CountingProvider::new());
    let store = Arc::new(StaleFirstReadStore::new(inner.clone()));
    let service = TranslationService::new(store, provider.clone());

    let record = service.translate("time", "it", Some("en")).await.unwrap();

    assert_eq!(record, winner);
    assert_eq!(provider.calls(), 1);
    assert_eq!(inner.len().await, 1);
    assert_eq!(service.stats().duplicate_inserts, 1);
}

/// 并发请求同一个三元组只留下一条记录，且都成功返回
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_store_one_record() {
    let provider = Arc::new(CountingProvider::with_delay(Duration::from_millis(20)));
    let (service, store) = memory_service(provider.clone());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.translate("time", "it", Some("en")).await
        }));
    }

    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert_eq!(record.translations, vec!["time-it"]);
    }
    assert_eq!(store.len().await, 1);
    assert!(provider.calls() >= 1);
}

/// 删除后再次请求会重新调用翻译服务
#[tokio::test]
async fn test_delete_then_refetch() {
    let provider = Arc::new(CountingProvider::new());
    let (service, store) = memory_service(provider.clone());

    service.translate("home", "es", Some("en")).await.unwrap();
    service
        .delete_word(&WordKey::new("home", "es", "en"))
        .await
        .unwrap();
    assert!(store.is_empty().await);

    service.translate("home", "es", Some("en")).await.unwrap();
    assert_eq!(provider.calls(), 2);
}

/// 删除不存在的记录返回 NotFound
#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let provider = Arc::new(CountingProvider::new());
    let (service, _store) = memory_service(provider);

    let err = service
        .delete_word(&WordKey::new("ghost", "es", "en"))
        .await
        .unwrap_err();
    assert!(matches!(err, WordCacheError::NotFound(_)));
    assert!(err.is_client_error());

    let err = service
        .delete_word(&WordKey::new("ghost", "", "en"))
        .await
        .unwrap_err();
    assert!(matches!(err, WordCacheError::Validation(_)));
}

/// 存储中的记录与服务返回的一致
#[tokio::test]
async fn test_stored_record_matches_response() {
    let provider = Arc::new(CountingProvider::new());
    let (service, store) = memory_service(provider);

    let record = service.translate("water", "de", Some("en")).await.unwrap();
    let stored = store
        .find_one("water", "de", Some("en"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record, stored);
}
