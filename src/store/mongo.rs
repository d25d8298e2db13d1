//! # MongoDB 存储实现
//!
//! 基于 MongoDB 异步驱动的翻译记录存储。连接在启动时显式建立，注入到服务中，
//! 关闭时显式释放。

use async_trait::async_trait;
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, Credential, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::schema::{json_schema, unique_index_keys, validate_record, UNIQUE_INDEX_NAME};
use super::WordStore;
use crate::env::{EnvConfig, EnvResult, EnvError};
use crate::error::{WordCacheError, WordCacheResult};
use crate::model::{WordKey, WordQuery, WordRecord};

/// 集合已存在
const NAMESPACE_EXISTS: i32 = 48;
/// 唯一索引冲突
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB 配置
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    /// 用户名和密码要么都有，要么都没有
    pub credentials: Option<(String, String)>,
    /// 数据库名称
    pub database_name: String,
    /// 集合名称
    pub collection_name: String,
}

impl MongoConfig {
    /// 从环境变量配置创建
    pub fn from_env(config: &EnvConfig) -> EnvResult<Self> {
        let credentials = match (&config.mongodb_username, &config.mongodb_password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            (None, None) => None,
            _ => {
                return Err(EnvError {
                    variable: "MONGO_INITDB_ROOT_PASSWORD".to_string(),
                    message: "MongoDB user name and password must be set together".to_string(),
                })
            }
        };

        Ok(Self {
            host: config.mongodb_host.clone(),
            port: config.mongodb_port,
            credentials,
            database_name: config.mongodb_database_name.clone(),
            collection_name: config.mongodb_collection_name.clone(),
        })
    }

    /// 连接字符串（不含凭据）
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// 基于 MongoDB 的翻译记录存储
pub struct MongoWordStore {
    client: Client,
    db: Database,
    collection: Collection<WordRecord>,
    collection_name: String,
}

impl MongoWordStore {
    /// 建立连接
    pub async fn connect(config: &MongoConfig) -> WordCacheResult<Self> {
        let mut options = ClientOptions::parse(config.connection_string()).await?;
        options.app_name = Some("word-cache".to_string());
        if let Some((ref user, ref password)) = config.credentials {
            let mut credential = Credential::default();
            credential.username = Some(user.clone());
            credential.password = Some(password.clone());
            options.credential = Some(credential);
        }

        let client = Client::with_options(options)?;
        let db = client.database(&config.database_name);
        let collection = db.collection::<WordRecord>(&config.collection_name);

        tracing::info!(
            "MongoDB 客户端已创建: {} ({}.{})",
            config.connection_string(),
            config.database_name,
            config.collection_name
        );

        Ok(Self {
            client,
            db,
            collection,
            collection_name: config.collection_name.clone(),
        })
    }

    /// 构建列表查询条件
    fn build_query_filter(query: &WordQuery) -> Document {
        let mut filter = doc! {};

        // 搜索关键词按字面匹配
        if let Some(ref search) = query.search {
            if !search.is_empty() {
                filter.insert(
                    "word",
                    doc! { "$regex": regex::escape(search), "$options": "i" },
                );
            }
        }

        if let Some(ref target_lang) = query.target_lang {
            filter.insert("target_lang", target_lang.as_str());
        }

        if let Some(ref source_lang) = query.source_lang {
            filter.insert("source_lang", source_lang.as_str());
        }

        filter
    }

    /// 只返回标识字段时的投影
    fn build_projection(query: &WordQuery) -> Option<Document> {
        if query.full_document {
            None
        } else {
            Some(doc! { "_id": 0, "word": 1, "target_lang": 1, "source_lang": 1 })
        }
    }

    fn key_filter(key: &WordKey) -> Document {
        doc! {
            "word": key.word.as_str(),
            "target_lang": key.target_lang.as_str(),
            "source_lang": key.source_lang.as_str(),
        }
    }
}

/// 提取服务端错误码
fn server_error_code(error: &mongodb::error::Error) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        _ => None,
    }
}

#[async_trait]
impl WordStore for MongoWordStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ensure_schema(&self) -> WordCacheResult<()> {
        match self
            .db
            .create_collection(&self.collection_name)
            .validator(json_schema())
            .await
        {
            Ok(()) => tracing::info!("已创建集合: {}", self.collection_name),
            Err(e) if server_error_code(&e) == Some(NAMESPACE_EXISTS) => {
                tracing::debug!("集合已存在，保持不变: {}", self.collection_name);
            }
            Err(e) => return Err(e.into()),
        }

        let index = IndexModel::builder()
            .keys(unique_index_keys())
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(UNIQUE_INDEX_NAME.to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        tracing::info!("唯一索引已就绪: {}", UNIQUE_INDEX_NAME);

        Ok(())
    }

    async fn find_one(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<Option<WordRecord>> {
        let mut filter = doc! { "word": word, "target_lang": target_lang };
        if let Some(source_lang) = source_lang {
            filter.insert("source_lang", source_lang);
        }

        Ok(self.collection.find_one(filter).await?)
    }

    async fn find_many(&self, query: &WordQuery) -> WordCacheResult<Vec<WordRecord>> {
        query.validate()?;

        let filter = Self::build_query_filter(query);
        let mut find = self
            .collection
            .find(filter)
            .sort(doc! { "word": query.sort_order.direction() })
            .skip(query.offset as u64)
            .limit(query.limit);
        if let Some(projection) = Self::build_projection(query) {
            find = find.projection(projection);
        }

        let records: Vec<WordRecord> = find.await?.try_collect().await?;
        Ok(records)
    }

    async fn insert(&self, record: &WordRecord) -> WordCacheResult<()> {
        validate_record(record)?;

        match self.collection.insert_one(record).await {
            Ok(_) => Ok(()),
            Err(e) if server_error_code(&e) == Some(DUPLICATE_KEY) => {
                Err(WordCacheError::DuplicateKey(record.key().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &WordKey) -> WordCacheResult<bool> {
        let result = self.collection.delete_one(Self::key_filter(key)).await?;
        Ok(result.deleted_count > 0)
    }

    async fn close(&self) -> WordCacheResult<()> {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB 连接已关闭");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;

    #[test]
    fn test_filter_escapes_search() {
        let query = WordQuery {
            search: Some("a.b".to_string()),
            target_lang: Some("it".to_string()),
            ..WordQuery::default()
        };
        let filter = MongoWordStore::build_query_filter(&query);
        let word = filter.get_document("word").unwrap();
        assert_eq!(word.get_str("$regex").unwrap(), "a\\.b");
        assert_eq!(word.get_str("$options").unwrap(), "i");
        assert_eq!(filter.get_str("target_lang").unwrap(), "it");
        assert!(!filter.contains_key("source_lang"));
    }

    #[test]
    fn test_empty_query_has_empty_filter() {
        let filter = MongoWordStore::build_query_filter(&WordQuery::default());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_projection_only_for_identity_listing() {
        let full = WordQuery::default();
        assert!(MongoWordStore::build_projection(&full).is_none());

        let identity = WordQuery {
            full_document: false,
            sort_order: SortOrder::Desc,
            ..WordQuery::default()
        };
        let projection = MongoWordStore::build_projection(&identity).unwrap();
        assert!(!projection.contains_key("definitions"));
        assert_eq!(projection.get_i32("word").unwrap(), 1);
    }
}
