//! # 翻译服务模块
//!
//! 外部翻译服务的抽象。实现必须是无状态的：同样的输入可以重复调用，失败不会留下副作用。
//!
//! - `google` - Google Cloud Translation v2
//! - `pool` - 阻塞调用使用的有界工作池

pub mod google;
pub mod pool;

pub use google::{GoogleTranslateProvider, ProviderConfig};
pub use pool::BlockingPool;

use async_trait::async_trait;

use crate::error::WordCacheResult;
use crate::model::WordRecord;

/// 翻译服务
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 服务名称，用于日志
    fn name(&self) -> &'static str;

    /// 翻译单个单词，返回待写入的完整记录
    ///
    /// `source_lang` 为 `None` 时由服务检测源语言
    async fn translate(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord>;
}
