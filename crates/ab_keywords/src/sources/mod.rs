use std::sync::Arc;

use ab_core::KeywordSource;

use crate::{KeywordConfig, KeywordProvider};

pub mod google;
pub mod rakko;

use google::GoogleSuggestSource;
use rakko::RakkoSource;

/// Builds the source that serves `provider`.
pub fn create_source(provider: &KeywordProvider, config: &KeywordConfig) -> Arc<dyn KeywordSource> {
    match provider {
        KeywordProvider::Primary(key) => {
            tracing::debug!("🔑 Using Rakko keyword provider");
            Arc::new(RakkoSource::new(key.clone(), config))
        }
        KeywordProvider::Fallback => {
            tracing::debug!("🆓 Using Google suggest provider");
            Arc::new(GoogleSuggestSource::new(config))
        }
    }
}

/// Per-request source construction, mirroring the model factory.
pub trait SourceFactory: Send + Sync {
    fn create(&self, provider: &KeywordProvider) -> Arc<dyn KeywordSource>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultSourceFactory {
    config: KeywordConfig,
}

impl DefaultSourceFactory {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }
}

impl SourceFactory for DefaultSourceFactory {
    fn create(&self, provider: &KeywordProvider) -> Arc<dyn KeywordSource> {
        create_source(provider, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selects_source() {
        let factory = DefaultSourceFactory::default();
        let primary = factory.create(&KeywordProvider::Primary("rk-1".to_string()));
        assert_eq!(primary.name(), "Rakko Keyword");
        let fallback = factory.create(&KeywordProvider::from_credential(Some("your_key")));
        assert_eq!(fallback.name(), "Google Suggest");
    }
}
