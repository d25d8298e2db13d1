//! 单词相关API处理器

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};

use super::{error_response, new_request_id, rejection_response, ApiResult};
use crate::model::WordKey;
use crate::web::types::{
    AppState, DeleteWordRequest, ListWordsQuery, TranslateRequest, WordListResponse, WordView,
};

/// 获取单词列表
///
/// 支持搜索、按语言筛选、排序和分页
pub async fn list_words(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListWordsQuery>, QueryRejection>,
) -> ApiResult<Json<WordListResponse>> {
    let request_id = new_request_id();
    let Query(query) = query.map_err(|e| rejection_response(e, request_id.clone()))?;

    let query = query.into_query();
    let records = state
        .service
        .list_words(&query)
        .await
        .map_err(|e| error_response(e, request_id))?;

    let words = records
        .into_iter()
        .map(|record| {
            if query.full_document {
                WordView::full(record)
            } else {
                WordView::identity(record)
            }
        })
        .collect();

    Ok(Json(WordListResponse {
        words,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// 按三元组删除单词
pub async fn delete_word(
    State(state): State<Arc<AppState>>,
    request: Result<Json<DeleteWordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let request_id = new_request_id();
    let Json(request) = request.map_err(|e| rejection_response(e, request_id.clone()))?;

    let key = WordKey::from(request);
    state
        .service
        .delete_word(&key)
        .await
        .map_err(|e| error_response(e, request_id))?;

    Ok(StatusCode::NO_CONTENT)
}

/// 翻译单词，优先返回缓存的结果
pub async fn translate_word(
    State(state): State<Arc<AppState>>,
    request: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<Json<WordView>> {
    let request_id = new_request_id();
    let Json(request) = request.map_err(|e| rejection_response(e, request_id.clone()))?;

    let source_lang = request
        .source_lang
        .as_deref()
        .map(str::trim)
        .filter(|lang| !lang.is_empty());

    let record = state
        .service
        .translate(&request.word, request.target_lang.trim(), source_lang)
        .await
        .map_err(|e| error_response(e, request_id))?;

    Ok(Json(WordView::full(record)))
}
