use std::sync::Arc;

use ab_core::{Error, GeneratedArticle, GenerationRequest};
use ab_keywords::KeywordProvider;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::AppState;

pub const CLAUDE_KEY_HEADER: &str = "x-claude-api-key";
pub const RAKKO_KEY_HEADER: &str = "x-rakko-api-key";
pub const CLAUDE_MODEL_HEADER: &str = "x-claude-model";

/// Non-empty header value, else the configured fallback.
fn resolve(headers: &HeaderMap, name: &str, fallback: Option<&str>) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or(fallback)
        .map(str::to_string)
}

fn keyword_provider(state: &AppState, headers: &HeaderMap) -> KeywordProvider {
    let key = resolve(headers, RAKKO_KEY_HEADER, state.config.keyword_api_key.as_deref());
    KeywordProvider::from_credential(key.as_deref())
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Auto Blog Writing API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/blog/health",
            "generate": "POST /api/blog/generate",
            "suggestions": "GET /api/blog/suggestions?keyword=xxx",
            "last": "GET /api/blog/last",
        },
    }))
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GeneratedArticle>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::from_error("Invalid request", e))?;

    let api_key = resolve(&headers, CLAUDE_KEY_HEADER, state.config.model_api_key.as_deref())
        .unwrap_or_default();
    // Checked here so no model name, including the offline one, skips the credential.
    if api_key.is_empty() {
        return Err(ApiError::from_error(
            "Failed to generate blog article",
            Error::Auth("Claude API key is required".to_string()),
        ));
    }
    let model_name = resolve(&headers, CLAUDE_MODEL_HEADER, state.config.default_model.as_deref())
        .unwrap_or_default();
    let model = state
        .models
        .create(&api_key, &model_name)
        .map_err(|e| ApiError::from_error("Failed to generate blog article", e))?;

    let provider = keyword_provider(&state, &headers);
    let source = state.keywords.create(&provider);
    info!(
        "🚀 Generating '{}' with {} via {}",
        request.keyword(),
        model.name(),
        source.name()
    );

    let article = state
        .pipeline
        .generate(&request, source.as_ref(), model.as_ref())
        .await
        .map_err(|e| {
            error!("❌ Blog generation failed: {}", e);
            ApiError::from_error("Failed to generate blog article", e)
        })?;

    if let Err(e) = state.cache.save(&article).await {
        warn!("⚠️ Could not cache article: {}", e);
    }
    Ok(Json(article))
}

/// The most recent article this server generated.
pub async fn last_article(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GeneratedArticle>, ApiError> {
    match state.cache.load().await {
        Ok(Some(article)) => Ok(Json(article)),
        Ok(None) => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "No article generated yet",
            "Generate an article first",
        )),
        Err(e) => Err(ApiError::from_error("Failed to load last article", e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub keyword: Option<String>,
}

pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Value>, ApiError> {
    let keyword = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .ok_or_else(|| ApiError::bad_request("keyword is required"))?;

    let source = state.keywords.create(&keyword_provider(&state, &headers));
    let suggestions = source.fetch_suggestions(keyword).await.map_err(|e| {
        error!("❌ Suggestion lookup failed: {}", e);
        ApiError::from_error("Failed to fetch suggestions", e)
    })?;
    Ok(Json(json!({ "suggestions": suggestions })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
