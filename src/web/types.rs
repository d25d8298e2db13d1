//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{SortOrder, WordKey, WordQuery, WordRecord, MAX_PAGE_SIZE};
use crate::service::{StatsSnapshot, TranslationService};

/// 应用状态
pub struct AppState {
    pub service: Arc<TranslationService>,
}

/// 单词列表查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct ListWordsQuery {
    /// 按单词搜索（不区分大小写）
    pub search: Option<String>,
    pub target_lang: Option<String>,
    pub source_lang: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub sorting_order: SortOrder,
    /// 是否返回释义、同义词和译文
    pub return_full_info: bool,
}

impl ListWordsQuery {
    /// 转换为存储查询，空字符串视为未提供
    pub fn into_query(self) -> WordQuery {
        WordQuery {
            search: non_empty(self.search),
            source_lang: non_empty(self.source_lang),
            target_lang: non_empty(self.target_lang),
            limit: self.limit,
            offset: self.offset,
            sort_order: self.sorting_order,
            full_document: self.return_full_info,
        }
    }
}

/// 翻译请求
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub word: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default)]
    pub source_lang: Option<String>,
}

/// 删除请求，三个字段都必须给出
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteWordRequest {
    pub word: String,
    pub target_lang: String,
    pub source_lang: String,
}

impl From<DeleteWordRequest> for WordKey {
    fn from(request: DeleteWordRequest) -> Self {
        WordKey {
            word: request.word,
            target_lang: request.target_lang,
            source_lang: request.source_lang,
        }
    }
}

/// 单词响应
///
/// 只返回标识字段时，三个列表字段不出现在输出中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordView {
    pub word: String,
    pub target_lang: String,
    pub source_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<String>>,
}

impl WordView {
    pub fn full(record: WordRecord) -> Self {
        Self {
            word: record.word,
            target_lang: record.target_lang,
            source_lang: record.source_lang,
            definitions: Some(record.definitions),
            synonyms: Some(record.synonyms),
            translations: Some(record.translations),
        }
    }

    pub fn identity(record: WordRecord) -> Self {
        Self {
            word: record.word,
            target_lang: record.target_lang,
            source_lang: record.source_lang,
            definitions: None,
            synonyms: None,
            translations: None,
        }
    }
}

/// 单词列表响应
#[derive(Debug, Serialize)]
pub struct WordListResponse {
    pub words: Vec<WordView>,
    pub limit: i64,
    pub offset: i64,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub stats: StatsSnapshot,
}

/// API错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// 错误代码
    pub error_code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// 请求ID（用于追踪）
    pub request_id: String,
    /// 时间戳
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

// 默认值函数
fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
