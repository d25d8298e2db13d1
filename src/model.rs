//! 数据模型
//!
//! 定义持久化的翻译记录、唯一键三元组和列表查询参数

use serde::{Deserialize, Serialize};

use crate::error::{helpers::validation_error, WordCacheResult};

/// 每页最大记录数
pub const MAX_PAGE_SIZE: i64 = 50;

/// 语言代码最大长度（例如 `mni-Mtei`）
const MAX_LANG_CODE_LEN: usize = 12;

/// 持久化的翻译记录
///
/// 三个列表字段在只返回标识字段的投影查询中不存在，反序列化时取空列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// 查询的单词，大小写敏感
    pub word: String,
    /// 目标语言
    pub target_lang: String,
    /// 源语言
    pub source_lang: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub translations: Vec<String>,
}

impl WordRecord {
    /// 只有标识字段的记录
    pub fn new(word: &str, target_lang: &str, source_lang: &str) -> Self {
        Self {
            word: word.to_string(),
            target_lang: target_lang.to_string(),
            source_lang: source_lang.to_string(),
            definitions: Vec::new(),
            synonyms: Vec::new(),
            translations: Vec::new(),
        }
    }

    /// 记录的唯一键
    pub fn key(&self) -> WordKey {
        WordKey {
            word: self.word.clone(),
            target_lang: self.target_lang.clone(),
            source_lang: self.source_lang.clone(),
        }
    }

    /// 去掉释义、同义词和译文，只保留标识字段
    pub fn into_identity(self) -> Self {
        Self {
            definitions: Vec::new(),
            synonyms: Vec::new(),
            translations: Vec::new(),
            ..self
        }
    }
}

/// 唯一键三元组 (word, target_lang, source_lang)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordKey {
    pub word: String,
    pub target_lang: String,
    pub source_lang: String,
}

impl WordKey {
    pub fn new(word: &str, target_lang: &str, source_lang: &str) -> Self {
        Self {
            word: word.to_string(),
            target_lang: target_lang.to_string(),
            source_lang: source_lang.to_string(),
        }
    }
}

impl std::fmt::Display for WordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} -> {})", self.word, self.source_lang, self.target_lang)
    }
}

/// 排序顺序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// MongoDB 排序方向
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// 单词列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordQuery {
    /// 按单词做不区分大小写的子串匹配
    pub search: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub limit: i64,
    pub offset: i64,
    pub sort_order: SortOrder,
    /// 为 false 时只返回标识字段
    pub full_document: bool,
}

impl Default for WordQuery {
    fn default() -> Self {
        Self {
            search: None,
            source_lang: None,
            target_lang: None,
            limit: MAX_PAGE_SIZE,
            offset: 0,
            sort_order: SortOrder::Asc,
            full_document: true,
        }
    }
}

impl WordQuery {
    /// 验证分页参数
    pub fn validate(&self) -> WordCacheResult<()> {
        crate::validation::validate_page(self.limit, self.offset)?;
        if let Some(ref lang) = self.source_lang {
            validate_lang_code(lang)?;
        }
        if let Some(ref lang) = self.target_lang {
            validate_lang_code(lang)?;
        }
        Ok(())
    }
}

/// 验证语言代码
///
/// 接受 `en`、`zh-CN`、`mni-Mtei` 这类代码：字母开头，由 ASCII 字母、数字和 `-` 组成
pub fn validate_lang_code(code: &str) -> WordCacheResult<()> {
    let valid = (2..=MAX_LANG_CODE_LEN).contains(&code.len())
        && code.starts_with(|c: char| c.is_ascii_alphabetic())
        && !code.ends_with('-')
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(validation_error(format!("invalid language code '{}'", code)))
    }
}
