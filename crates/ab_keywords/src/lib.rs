pub mod placeholders;
pub mod provider;
pub mod sources;

pub use provider::KeywordProvider;
pub use sources::{create_source, DefaultSourceFactory, SourceFactory};
pub use sources::google::GoogleSuggestSource;
pub use sources::rakko::RakkoSource;

pub const DEFAULT_RAKKO_BASE_URL: &str = "https://api.related-keywords.com";
pub const DEFAULT_SUGGEST_URL: &str = "http://suggestqueries.google.com/complete/search";

/// Endpoints and limits for the keyword providers.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    pub rakko_base_url: String,
    pub suggest_url: String,
    pub timeout_secs: u64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            rakko_base_url: DEFAULT_RAKKO_BASE_URL.to_string(),
            suggest_url: DEFAULT_SUGGEST_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

pub mod prelude {
    pub use super::{create_source, KeywordConfig, KeywordProvider, SourceFactory};
    pub use ab_core::{Error, KeywordSource, Result};
}
