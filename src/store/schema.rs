//! 写入前的记录验证
//!
//! 与存储引擎无关的应用层检查在每次写入前执行；MongoDB 另外通过 `$jsonSchema`
//! 验证器在服务端做同样的约束

use bson::{doc, Document};

use crate::error::{helpers::validation_error, WordCacheResult};
use crate::model::{validate_lang_code, WordRecord};

/// 唯一索引名称
pub const UNIQUE_INDEX_NAME: &str = "word_target_lang_source_lang_unique";

/// 验证即将写入的记录
pub fn validate_record(record: &WordRecord) -> WordCacheResult<()> {
    if record.word.is_empty() {
        return Err(validation_error("word must not be empty"));
    }
    if record.word.chars().any(char::is_whitespace) {
        return Err(validation_error("only one word is allowed"));
    }
    validate_lang_code(&record.target_lang)?;
    validate_lang_code(&record.source_lang)?;

    for (field, values) in [
        ("definitions", &record.definitions),
        ("synonyms", &record.synonyms),
        ("translations", &record.translations),
    ] {
        if values.iter().any(|value| value.is_empty()) {
            return Err(validation_error(format!("{} must not contain empty strings", field)));
        }
    }
    Ok(())
}

/// MongoDB 集合验证器
///
/// MongoDB 的 `$jsonSchema` 不支持 `default`，列表字段只约束类型
pub fn json_schema() -> Document {
    let string_list = doc! {
        "bsonType": "array",
        "items": { "bsonType": "string" },
    };

    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "title": "WordRecord",
            "required": ["word", "target_lang", "source_lang"],
            "properties": {
                "word": { "bsonType": "string", "minLength": 1 },
                "target_lang": { "bsonType": "string", "minLength": 2 },
                "source_lang": { "bsonType": "string", "minLength": 2 },
                "definitions": string_list.clone(),
                "synonyms": string_list.clone(),
                "translations": string_list,
            },
        }
    }
}

/// 唯一索引的键
pub fn unique_index_keys() -> Document {
    doc! { "word": 1, "target_lang": 1, "source_lang": 1 }
}
