//! Google Cloud Translation v2 客户端
//!
//! 使用 `reqwest::blocking` 发送请求，调用在 [`BlockingPool`] 的工作线程上执行。

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::pool::BlockingPool;
use super::TranslationProvider;
use crate::env::{EnvConfig, EnvError, EnvResult};
use crate::error::{helpers::provider_error, WordCacheResult};
use crate::model::WordRecord;

/// 翻译服务配置
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_url: String,
    pub api_key: String,
    /// 单次请求超时
    pub timeout: Duration,
    /// 同时进行的请求数上限
    pub workers: usize,
}

impl ProviderConfig {
    /// 从环境变量配置创建，缺少 API 密钥时报错
    pub fn from_env(config: &EnvConfig) -> EnvResult<Self> {
        let api_key = config.provider_api_key.clone().ok_or_else(|| EnvError {
            variable: "API_KEY".to_string(),
            message: "translation provider API key is not set".to_string(),
        })?;

        Ok(Self {
            api_url: config.provider_api_url.clone(),
            api_key,
            timeout: config.provider_timeout,
            workers: config.provider_workers,
        })
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

/// 单条翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// 解析响应体，取第一条翻译
pub fn parse_response(status: u16, body: &str) -> WordCacheResult<Translation> {
    if status >= 400 {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(provider_error(format!("HTTP {}: {}", status, message)));
    }

    let response: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| provider_error(format!("malformed response: {}", e)))?;

    response
        .data
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| provider_error("response contains no translations"))
}

/// 把翻译结果组装成待写入的记录
///
/// 源语言优先取调用方给出的值，其次取服务检测到的值
pub fn build_record(
    word: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    translation: Translation,
) -> WordCacheResult<WordRecord> {
    let source_lang = source_lang
        .map(str::to_string)
        .or(translation.detected_source_language)
        .filter(|lang| !lang.is_empty())
        .ok_or_else(|| provider_error("source language was neither given nor detected"))?;

    let translated = translation.translated_text.trim().to_string();
    if translated.is_empty() {
        return Err(provider_error("empty translation"));
    }

    // 释义和同义词暂时没有数据来源，用原词和译文占位
    let placeholder = vec![word.to_string(), translated.clone()];
    Ok(WordRecord {
        definitions: placeholder.clone(),
        synonyms: placeholder,
        translations: vec![translated],
        ..WordRecord::new(word, target_lang, &source_lang)
    })
}

struct GoogleClient {
    config: ProviderConfig,
    // 阻塞客户端只能在工作线程上创建
    http: OnceLock<reqwest::blocking::Client>,
}

impl GoogleClient {
    fn http(&self) -> WordCacheResult<&reqwest::blocking::Client> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(concat!("word-cache/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(self.http.get_or_init(|| client))
    }

    fn endpoint(&self) -> WordCacheResult<url::Url> {
        url::Url::parse_with_params(&self.config.api_url, &[("key", &self.config.api_key)])
            .map_err(|e| provider_error(format!("invalid provider URL: {}", e)))
    }

    fn translate_blocking(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord> {
        let request = TranslateRequest {
            q: word,
            target: target_lang,
            source: source_lang,
            format: "text",
        };

        let response = self.http()?.post(self.endpoint()?).json(&request).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        let translation = parse_response(status, &body)?;
        build_record(word, target_lang, source_lang, translation)
    }
}

/// Google 翻译服务
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    inner: Arc<GoogleClient>,
    pool: BlockingPool,
}

impl GoogleTranslateProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let pool = BlockingPool::new(config.workers);
        tracing::info!(
            "翻译服务已配置: {} (并发 {}, 超时 {:?})",
            config.api_url,
            pool.size(),
            config.timeout
        );
        Self {
            inner: Arc::new(GoogleClient {
                config,
                http: OnceLock::new(),
            }),
            pool,
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(
        &self,
        word: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> WordCacheResult<WordRecord> {
        let inner = self.inner.clone();
        let word = word.to_string();
        let target_lang = target_lang.to_string();
        let source_lang = source_lang.map(str::to_string);

        tracing::debug!("调用翻译服务: {} -> {}", word, target_lang);
        self.pool
            .run(move || inner.translate_blocking(&word, &target_lang, source_lang.as_deref()))
            .await
    }
}
