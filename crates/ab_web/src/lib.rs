use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, ServerConfig};

pub const DEFAULT_PORT: u16 = 3001;

pub fn blog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_article))
        .route("/suggestions", get(handlers::suggestions))
        .route("/health", get(handlers::health))
        .route("/last", get(handlers::last_article))
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api/blog", blog_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `port` on all interfaces and serves until the process stops.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("🚀 Server listening on http://localhost:{}", port);
    tracing::info!("📝 API endpoints under http://localhost:{}/api/blog", port);
    axum::serve(listener, create_app(state)).await
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState, ServerConfig};
    pub use ab_core::{Error, GeneratedArticle, GenerationRequest, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::KeywordSource;
    use ab_inference::models::ModelFactory;
    use ab_inference::testing::{test_templates, CountingSource, ScriptedModel};
    use ab_inference::TemplateStore;
    use ab_keywords::{KeywordProvider, SourceFactory};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Hands out one shared scripted model and records requested credentials.
    struct SharedModelFactory {
        model: Arc<ScriptedModel>,
        requested: Mutex<Vec<(String, String)>>,
    }

    impl ModelFactory for SharedModelFactory {
        fn create(
            &self,
            api_key: &str,
            model_name: &str,
        ) -> ab_core::Result<Arc<dyn ab_core::CompletionModel>> {
            if api_key.is_empty() {
                return Err(ab_core::Error::Auth("Claude API key is required".to_string()));
            }
            self.requested
                .lock()
                .unwrap()
                .push((api_key.to_string(), model_name.to_string()));
            Ok(self.model.clone())
        }
    }

    struct SharedSourceFactory {
        source: Arc<CountingSource>,
        providers: Mutex<Vec<KeywordProvider>>,
    }

    impl SourceFactory for SharedSourceFactory {
        fn create(&self, provider: &KeywordProvider) -> Arc<dyn KeywordSource> {
            self.providers.lock().unwrap().push(provider.clone());
            self.source.clone()
        }
    }

    struct Harness {
        model: Arc<ScriptedModel>,
        models: Arc<SharedModelFactory>,
        source: Arc<CountingSource>,
        sources: Arc<SharedSourceFactory>,
    }

    impl Harness {
        fn new(model: ScriptedModel, source: CountingSource) -> Self {
            let model = Arc::new(model);
            let source = Arc::new(source);
            Self {
                models: Arc::new(SharedModelFactory {
                    model: model.clone(),
                    requested: Mutex::new(Vec::new()),
                }),
                sources: Arc::new(SharedSourceFactory {
                    source: source.clone(),
                    providers: Mutex::new(Vec::new()),
                }),
                model,
                source,
            }
        }

        fn app(&self, config: ServerConfig) -> Router {
            let state = AppState::new(Arc::new(test_templates()), config)
                .with_model_factory(self.models.clone())
                .with_source_factory(self.sources.clone());
            create_app(state)
        }
    }

    fn generate_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/blog/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn keyed_config() -> ServerConfig {
        ServerConfig {
            model_api_key: Some("sk-env".to_string()),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_empty_keyword_is_rejected_before_any_call() {
        let harness = Harness::new(ScriptedModel::new(), CountingSource::new(Vec::new()));

        let cases = [
            (r#"{"keyword":""}"#, "Keyword is required"),
            (r#"{"keyword":"   "}"#, "Keyword is required"),
            (r#"{}"#, "Keyword is required"),
            ("not json", "Invalid request body"),
        ];
        for (body, label) in cases {
            let response = harness
                .app(keyed_config())
                .oneshot(generate_request(body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
            let json = json_body(response).await;
            assert_eq!(json["error"], label, "body {}", body);
            assert!(json["message"].is_string());
        }

        assert_eq!(harness.model.calls(), 0);
        assert_eq!(harness.source.title_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_model_key_is_unauthorized() {
        let harness = Harness::new(ScriptedModel::new(), CountingSource::new(Vec::new()));

        let response = harness
            .app(ServerConfig::default())
            .oneshot(generate_request(r#"{"keyword":"budget travel"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Claude API key is not configured");
        assert_eq!(harness.model.calls(), 0);
        assert_eq!(harness.source.title_calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_model_header_still_needs_a_key() {
        let harness = Harness::new(ScriptedModel::new(), CountingSource::new(Vec::new()));
        let state = AppState::new(Arc::new(test_templates()), ServerConfig::default())
            .with_source_factory(harness.sources.clone());

        let mut request = generate_request(r#"{"keyword":"budget travel"}"#);
        request
            .headers_mut()
            .insert("x-claude-model", "dummy".parse().unwrap());

        let response = create_app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(harness.source.title_calls(), 0);
        assert!(harness.sources.providers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_article_is_kept_in_memory() {
        let harness = Harness::new(
            ScriptedModel::new().respond("STEP lead", "Lead text"),
            CountingSource::new(vec!["A title".to_string()]),
        );
        let app = harness.app(keyed_config());
        let last = || Request::builder().uri("/api/blog/last").body(Body::empty()).unwrap();

        let response = app.clone().oneshot(last()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(generate_request(r#"{"keyword":"budget travel"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(last()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["keyword"], "budget travel");
        assert_eq!(json["leadText"], "Lead text");
    }

    #[tokio::test]
    async fn test_headers_override_environment() {
        let harness = Harness::new(ScriptedModel::new(), CountingSource::new(Vec::new()));

        let mut request = generate_request(r#"{"keyword":"budget travel"}"#);
        let headers = request.headers_mut();
        headers.insert("x-claude-api-key", "sk-header".parse().unwrap());
        headers.insert("x-claude-model", "claude-sonnet-4-5".parse().unwrap());
        headers.insert("x-rakko-api-key", "your_rakko_key".parse().unwrap());

        let response = harness.app(keyed_config()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let requested = harness.models.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![("sk-header".to_string(), "claude-sonnet-4-5".to_string())]
        );
        let providers = harness.sources.providers.lock().unwrap().clone();
        assert_eq!(providers, vec![KeywordProvider::Fallback]);
    }

    #[tokio::test]
    async fn test_model_failure_is_reported_verbatim() {
        let harness = Harness::new(
            ScriptedModel::new().fail("STEP intent", "400 (invalid_request_error): credit balance is too low"),
            CountingSource::new(vec!["A title".to_string()]),
        );

        let response = harness
            .app(keyed_config())
            .oneshot(generate_request(r#"{"keyword":"budget travel"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to generate blog article");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("credit balance is too low"));
        assert_eq!(harness.model.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_budget_travel_end_to_end() {
        let outline = "h2：Planning\n  h3：Flights\n\nh2：Lodging\n\nh2：Food\n\nh2：Summary";
        let model = ScriptedModel::new()
            .respond("STEP intent", "a:Save money\nb:Find destinations\nc:Plan a route\n[a] article count: 7\n[b] article count: 2\n[c] article count: 1")
            .respond("STEP outline", outline)
            .respond("STEP titles", "Travel for less\nCheap trips\n# ignored\n\nBudget guide")
            .respond("STEP lead", "Lead text")
            .respond_with("STEP body", |prompt| {
                let target = prompt
                    .lines()
                    .find_map(|line| line.strip_prefix("target=h2："))
                    .unwrap_or("?");
                format!("Body for {}", target)
            })
            .respond("STEP summary", "Summary text");

        // The real fallback source serves titles without touching the network.
        let state = AppState::new(Arc::new(test_templates()), keyed_config())
            .with_model_factory(Arc::new(SharedModelFactory {
                model: Arc::new(model),
                requested: Mutex::new(Vec::new()),
            }));

        let response = create_app(state)
            .oneshot(generate_request(r#"{"keyword":"budget travel","genre":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["keyword"], "budget travel");
        assert_eq!(json["searchIntent"]["a"], "Save money");
        assert_eq!(json["searchIntent"]["distribution"]["a"], 7);
        assert_eq!(json["outline"].as_array().unwrap().len(), 4);
        assert_eq!(json["outline"][0]["subheadings"][0], "Flights");
        assert_eq!(
            json["titleCandidates"],
            serde_json::json!(["Travel for less", "Cheap trips", "Budget guide"])
        );
        assert_eq!(json["leadText"], "Lead text");
        assert_eq!(
            json["body"],
            "Body for Planning\n\nBody for Lodging\n\nBody for Food"
        );
        assert_eq!(json["summary"], "Summary text");
        assert!(json["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_suggestions() {
        let harness = Harness::new(
            ScriptedModel::new(),
            CountingSource::new(vec!["diet plan".to_string()]),
        );

        let request = Request::builder()
            .uri("/api/blog/suggestions?keyword=diet")
            .header("x-rakko-api-key", "rk-123")
            .body(Body::empty())
            .unwrap();
        let response = harness.app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["suggestions"][0], "diet plan");
        assert_eq!(
            harness.sources.providers.lock().unwrap().clone(),
            vec![KeywordProvider::Primary("rk-123".to_string())]
        );

        let request = Request::builder()
            .uri("/api/blog/suggestions")
            .body(Body::empty())
            .unwrap();
        let response = harness.app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(harness.source.suggestion_calls(), 1);
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_a_server_error() {
        let harness = Harness::new(ScriptedModel::new(), CountingSource::failing("provider down"));

        let request = Request::builder()
            .uri("/api/blog/suggestions?keyword=diet")
            .body(Body::empty())
            .unwrap();
        let response = harness.app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to fetch suggestions");
        assert!(json["message"].as_str().unwrap().contains("provider down"));
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let app = create_app(AppState::new(
            Arc::new(TemplateStore::default()),
            ServerConfig::default(),
        ));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/blog/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["endpoints"]["health"], "/api/blog/health");
    }
}
