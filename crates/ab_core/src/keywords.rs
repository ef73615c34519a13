use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait KeywordSource: Send + Sync {
    /// Returns the name of the keyword provider
    fn name(&self) -> &str;

    /// Titles of articles that rank for the keyword
    async fn fetch_candidate_titles(&self, keyword: &str) -> Result<Vec<String>>;

    /// Autocomplete-style suggestions for the keyword
    async fn fetch_suggestions(&self, keyword: &str) -> Result<Vec<String>>;

    async fn fetch_related_keywords(&self, keyword: &str) -> Result<Vec<String>>;
}
