use std::fmt;
use std::sync::Arc;

use ab_core::ResultCache;
use ab_inference::models::{DefaultModelFactory, ModelFactory};
use ab_inference::{ArticlePipeline, Config, PipelineOptions, TemplateStore};
use ab_keywords::{DefaultSourceFactory, KeywordConfig, SourceFactory};
use ab_storage::MemoryCache;

/// Values loaded from the environment at startup. Request headers override
/// the credentials and model per request.
#[derive(Clone, Default)]
pub struct ServerConfig {
    pub model_api_key: Option<String>,
    pub keyword_api_key: Option<String>,
    pub default_model: Option<String>,
    pub pipeline: PipelineOptions,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("model_api_key", &self.model_api_key.as_ref().map(|_| "<redacted>"))
            .field("keyword_api_key", &self.keyword_api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

pub struct AppState {
    pub pipeline: ArticlePipeline,
    pub config: ServerConfig,
    pub models: Arc<dyn ModelFactory>,
    pub keywords: Arc<dyn SourceFactory>,
    /// Last article generated by this process.
    pub cache: Arc<dyn ResultCache>,
}

impl AppState {
    pub fn new(templates: Arc<TemplateStore>, config: ServerConfig) -> Self {
        let pipeline = ArticlePipeline::new(templates).with_options(config.pipeline.clone());
        Self {
            pipeline,
            config,
            models: Arc::new(DefaultModelFactory::new(Config::default())),
            keywords: Arc::new(DefaultSourceFactory::new(KeywordConfig::default())),
            cache: Arc::new(MemoryCache::new()),
        }
    }

    pub fn with_model_factory(mut self, models: Arc<dyn ModelFactory>) -> Self {
        self.models = models;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_source_factory(mut self, keywords: Arc<dyn SourceFactory>) -> Self {
        self.keywords = keywords;
        self
    }
}
