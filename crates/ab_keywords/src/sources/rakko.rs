use std::fmt;
use std::time::Duration;

use ab_core::{Error, KeywordSource, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::placeholders::placeholder_titles;
use crate::KeywordConfig;

/// Most ranking titles handed to the search-intent step.
const MAX_TITLES: usize = 10;

#[derive(Deserialize)]
struct TitlesResponse {
    #[serde(default)]
    titles: Vec<String>,
}

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct RelatedResponse {
    #[serde(default)]
    related: Vec<String>,
}

/// Credentialed keyword-data API.
pub struct RakkoSource {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl RakkoSource {
    pub fn new(api_key: impl Into<String>, config: &KeywordConfig) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(config.timeout_secs),
            api_key: api_key.into(),
            base_url: config.rakko_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, keyword: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .query(&[("keyword", keyword)])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

impl fmt::Debug for RakkoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RakkoSource")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl KeywordSource for RakkoSource {
    fn name(&self) -> &str {
        "Rakko Keyword"
    }

    async fn fetch_candidate_titles(&self, keyword: &str) -> Result<Vec<String>> {
        match self.get::<TitlesResponse>("serp", keyword).await {
            Ok(response) => Ok(response.titles.into_iter().take(MAX_TITLES).collect()),
            Err(e) => {
                tracing::warn!("⚠️ Ranking titles unavailable ({}); using placeholder titles", e);
                Ok(placeholder_titles(keyword))
            }
        }
    }

    async fn fetch_suggestions(&self, keyword: &str) -> Result<Vec<String>> {
        self.get::<SuggestResponse>("suggest", keyword)
            .await
            .map(|response| response.suggestions)
            .map_err(|e| {
                tracing::error!("Rakko suggest request failed: {}", e);
                Error::KeywordProvider(format!("failed to fetch suggestions: {}", e))
            })
    }

    async fn fetch_related_keywords(&self, keyword: &str) -> Result<Vec<String>> {
        self.get::<RelatedResponse>("related", keyword)
            .await
            .map(|response| response.related)
            .map_err(|e| {
                tracing::error!("Rakko related request failed: {}", e);
                Error::KeywordProvider(format!("failed to fetch related keywords: {}", e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> RakkoSource {
        let config = KeywordConfig {
            rakko_base_url: server.uri(),
            ..KeywordConfig::default()
        };
        RakkoSource::new("rk-test", &config)
    }

    #[tokio::test]
    async fn test_titles_are_capped_at_ten() {
        let server = MockServer::start().await;
        let titles: Vec<String> = (1..=12).map(|i| format!("Title {}", i)).collect();
        Mock::given(method("GET"))
            .and(path("/serp"))
            .and(query_param("keyword", "budget travel"))
            .and(header("authorization", "Bearer rk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "titles": titles })))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_candidate_titles("budget travel").await.unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result[0], "Title 1");
    }

    #[tokio::test]
    async fn test_title_failure_degrades_to_placeholders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/serp"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_candidate_titles("budget travel").await.unwrap();
        assert_eq!(result, placeholder_titles("budget travel"));
    }

    #[tokio::test]
    async fn test_missing_titles_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/serp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_candidate_titles("k").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/suggest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "suggestions": ["budget travel europe", "budget travel tips"]
            })))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_suggestions("budget travel").await.unwrap();
        assert_eq!(result, vec!["budget travel europe", "budget travel tips"]);
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = source_for(&server);
        assert!(matches!(
            source.fetch_suggestions("k").await,
            Err(Error::KeywordProvider(_))
        ));
        assert!(matches!(
            source.fetch_related_keywords("k").await,
            Err(Error::KeywordProvider(_))
        ));
    }
}
