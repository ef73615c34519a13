use std::time::Duration;

use ab_core::{KeywordSource, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::placeholders::{placeholder_suggestions, placeholder_titles, related_variations};
use crate::KeywordConfig;

const MAX_RELATED: usize = 10;
const MIN_RELATED: usize = 5;

/// Free public suggestion endpoint. Never fails: network or shape problems
/// degrade to deterministic placeholder data.
#[derive(Debug, Clone)]
pub struct GoogleSuggestSource {
    client: Client,
    suggest_url: String,
    timeout: Duration,
}

impl GoogleSuggestSource {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            client: Client::new(),
            suggest_url: config.suggest_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn query(&self, keyword: &str) -> Result<Vec<String>> {
        let url = Url::parse_with_params(&self.suggest_url, &[("client", "firefox"), ("q", keyword)])
            .map_err(|e| ab_core::Error::KeywordProvider(format!("invalid suggest url: {}", e)))?;
        let body: Value = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_suggest_response(&body))
    }
}

/// The endpoint answers `[query, [suggestion, ...]]`. Anything else reads as
/// no suggestions.
fn parse_suggest_response(body: &Value) -> Vec<String> {
    body.get(1)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl KeywordSource for GoogleSuggestSource {
    fn name(&self) -> &str {
        "Google Suggest"
    }

    async fn fetch_candidate_titles(&self, keyword: &str) -> Result<Vec<String>> {
        // No ranking data without the paid provider.
        Ok(placeholder_titles(keyword))
    }

    async fn fetch_suggestions(&self, keyword: &str) -> Result<Vec<String>> {
        match self.query(keyword).await {
            Ok(suggestions) => Ok(suggestions),
            Err(e) => {
                tracing::warn!("⚠️ Suggest endpoint failed ({}); using placeholder suggestions", e);
                Ok(placeholder_suggestions(keyword))
            }
        }
    }

    async fn fetch_related_keywords(&self, keyword: &str) -> Result<Vec<String>> {
        let mut related = self.fetch_suggestions(keyword).await?;
        if related.len() < MIN_RELATED {
            related.extend(related_variations(keyword));
        }
        related.truncate(MAX_RELATED);
        Ok(related)
    }
}
