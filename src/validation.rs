//! 请求输入验证
//!
//! 在请求到达读穿缓存服务之前拒绝格式错误的输入

use crate::error::{helpers::validation_error, WordCacheResult};
use crate::model::{validate_lang_code, WordKey, MAX_PAGE_SIZE};

/// 规范化待翻译的单词
///
/// 去掉首尾空白；空字符串或包含内部空白（多个单词）都会被拒绝
pub fn normalize_word(word: &str) -> WordCacheResult<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err(validation_error("word must not be empty"));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(validation_error("only one word is allowed"));
    }
    Ok(trimmed.to_string())
}

/// 验证删除请求的三元组，三个字段都必须给出
pub fn validate_key(key: &WordKey) -> WordCacheResult<()> {
    if key.word.is_empty() {
        return Err(validation_error("word must not be empty"));
    }
    validate_lang_code(&key.target_lang)?;
    validate_lang_code(&key.source_lang)?;
    Ok(())
}

/// 验证分页参数
pub fn validate_page(limit: i64, offset: i64) -> WordCacheResult<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(validation_error(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    if offset < 0 {
        return Err(validation_error("offset must not be negative"));
    }
    Ok(())
}
