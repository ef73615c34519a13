use std::sync::Arc;

use ab_core::{CompletionModel, Error, Result};

use crate::Config;

pub mod anthropic;
pub mod dummy;

pub use anthropic::AnthropicModel;
pub use dummy::DummyModel;

/// Model name that selects the offline [`DummyModel`].
pub const DUMMY_MODEL: &str = "dummy";

/// Builds the completion model named in `config`.
///
/// Every model except [`DUMMY_MODEL`] needs an API key; a missing one is an
/// [`Error::Auth`] so callers can answer before anything is sent upstream.
pub fn create_model(config: Config) -> Result<Arc<dyn CompletionModel>> {
    if config.model_name() == DUMMY_MODEL {
        return Ok(Arc::new(DummyModel::new()));
    }
    if config.api_key.as_deref().map_or(true, |key| key.trim().is_empty()) {
        return Err(Error::Auth("Claude API key is required".to_string()));
    }
    Ok(Arc::new(AnthropicModel::new(&config)?))
}

/// Per-request model construction. The web layer resolves the credential and
/// model name for each request and asks the factory for a client.
pub trait ModelFactory: Send + Sync {
    fn create(&self, api_key: &str, model_name: &str) -> Result<Arc<dyn CompletionModel>>;
}

/// Builds models from a base [`Config`], overriding key and model name.
#[derive(Debug, Clone, Default)]
pub struct DefaultModelFactory {
    base: Config,
}

impl DefaultModelFactory {
    pub fn new(base: Config) -> Self {
        Self { base }
    }
}

impl ModelFactory for DefaultModelFactory {
    fn create(&self, api_key: &str, model_name: &str) -> Result<Arc<dyn CompletionModel>> {
        let config = self
            .base
            .clone()
            .with_api_key(api_key)
            .with_model_name(model_name);
        create_model(config)
    }
}
