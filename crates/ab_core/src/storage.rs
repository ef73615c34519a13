use async_trait::async_trait;

use crate::types::GeneratedArticle;
use crate::Result;

/// Keeps the most recently generated article between runs.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn load(&self) -> Result<Option<GeneratedArticle>>;

    async fn save(&self, article: &GeneratedArticle) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
