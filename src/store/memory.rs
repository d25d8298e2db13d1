//! 进程内翻译记录存储
//!
//! 与 MongoDB 实现保持相同的语义：三元组唯一、按单词排序、不区分大小写的子串搜索、
//! 投影和分页。用于测试以及 `WORD_CACHE_STORE=memory` 的本地运行。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::validate_record;
use super::WordStore;
use crate::error::{WordCacheError, WordCacheResult};
use crate::model::{SortOrder, WordKey, WordQuery, WordRecord};

/// 进程内存储，键的顺序即单词的升序
#[derive(Default)]
pub struct MemoryWordStore {
    records: RwLock<BTreeMap<WordKey, WordRecord>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前记录数
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn record_matches(record: &WordRecord, query: &WordQuery, search: Option<&str>) -> bool {
    if let Some(search) = search {
        if !record.word.to_lowercase().contains(search) {
            return false;
        }
    }
    if let Some(ref target_lang) = query.target_lang {
        if &record.target_lang != target_lang {
            return false;
        }
    }
    if let Some(ref source_lang) = query.source_lang {
        if &record.source_lang != source_lang {
            return false;
        }
    }
    true
}

#[async_trait]
impl WordStore for MemoryWordStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ensure_schema(&self) -> WordCacheResult<()> {
        Ok(())
    }

    async fn find_one(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<Option<WordRecord>> {
        let records = self.records.read().await;

        if let Some(source_lang) = source_lang {
            return Ok(records
                .get(&WordKey::new(word, target_lang, source_lang))
                .cloned());
        }

        Ok(records
            .values()
            .find(|record| record.word == word && record.target_lang == target_lang)
            .cloned())
    }

    async fn find_many(&self, query: &WordQuery) -> WordCacheResult<Vec<WordRecord>> {
        query.validate()?;

        let search = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let records = self.records.read().await;

        let matching = records
            .values()
            .filter(|record| record_matches(record, query, search.as_deref()));
        let ordered: Box<dyn Iterator<Item = &WordRecord> + '_> = match query.sort_order {
            SortOrder::Asc => Box::new(matching),
            SortOrder::Desc => Box::new(matching.rev()),
        };

        Ok(ordered
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|record| {
                if query.full_document {
                    record.clone()
                } else {
                    record.clone().into_identity()
                }
            })
            .collect())
    }

    async fn insert(&self, record: &WordRecord) -> WordCacheResult<()> {
        validate_record(record)?;

        let key = record.key();
        let mut records = self.records.write().await;
        if records.contains_key(&key) {
            return Err(WordCacheError::DuplicateKey(key.to_string()));
        }
        records.insert(key, record.clone());
        Ok(())
    }

    async fn delete(&self, key: &WordKey) -> WordCacheResult<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn close(&self) -> WordCacheResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, target_lang: &str, source_lang: &str) -> WordRecord {
        WordRecord {
            translations: vec![format!("{}-{}", word, target_lang)],
            ..WordRecord::new(word, target_lang, source_lang)
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_triple() {
        let store = MemoryWordStore::new();
        store.insert(&record("time", "it", "en")).await.unwrap();

        let err = store.insert(&record("time", "it", "en")).await.unwrap_err();
        assert!(matches!(err, WordCacheError::DuplicateKey(_)));
        assert_eq!(store.len().await, 1);

        // 同一个单词的其它语言对不冲突
        store.insert(&record("time", "fr", "en")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_one_without_source_lang() {
        let store = MemoryWordStore::new();
        store.insert(&record("Time", "it", "en")).await.unwrap();

        let found = store.find_one("Time", "it", None).await.unwrap();
        assert_eq!(found.unwrap().source_lang, "en");
        assert!(store.find_one("Time", "it", Some("de")).await.unwrap().is_none());
        // 大小写敏感
        assert!(store.find_one("time", "it", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_literal() {
        let store = MemoryWordStore::new();
        for word in ["Water", "waterfall", "fire", "w.ter"] {
            store.insert(&record(word, "fr", "en")).await.unwrap();
        }

        let query = WordQuery {
            search: Some("WATER".to_string()),
            ..WordQuery::default()
        };
        let words: Vec<String> = store
            .find_many(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.word)
            .collect();
        assert_eq!(words, vec!["Water", "waterfall"]);

        let query = WordQuery {
            search: Some("w.t".to_string()),
            ..WordQuery::default()
        };
        assert_eq!(store.find_many(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = MemoryWordStore::new();
        store.insert(&record("home", "es", "en")).await.unwrap();

        let key = WordKey::new("home", "es", "en");
        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_validates_record() {
        let store = MemoryWordStore::new();
        let err = store
            .insert(&record("two words", "es", "en"))
            .await
            .unwrap_err();
        assert!(matches!(err, WordCacheError::Validation(_)));
        assert!(store.is_empty().await);
    }
}
