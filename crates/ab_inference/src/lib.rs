pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod templates;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Settings for building a completion model.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: String,
    /// Per-call timeout. Body sections can take minutes to generate.
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 300,
            max_tokens: 4096,
        }
    }
}

impl Config {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn model_name(&self) -> &str {
        self.model_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }
}

pub mod prelude {
    pub use super::models::{create_model, DefaultModelFactory, ModelFactory};
    pub use super::pipeline::{ArticlePipeline, PipelineOptions};
    pub use super::templates::{TemplateKind, TemplateStore};
    pub use super::Config;
    pub use ab_core::{CompletionModel, Error, GeneratedArticle, GenerationRequest, Result};
}

pub use models::create_model;
pub use pipeline::{ArticlePipeline, PipelineOptions};
pub use templates::{TemplateKind, TemplateStore};
