use std::sync::Arc;

use ab_core::{GeneratedArticle, Result, ResultCache};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local cache. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    slot: Arc<RwLock<Option<GeneratedArticle>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn load(&self) -> Result<Option<GeneratedArticle>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, article: &GeneratedArticle) -> Result<()> {
        *self.slot.write().await = Some(article.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.slot.write().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::SearchIntent;
    use chrono::Utc;

    fn article(keyword: &str) -> GeneratedArticle {
        GeneratedArticle {
            keyword: keyword.to_string(),
            search_intent: SearchIntent::default(),
            outline: Vec::new(),
            title_candidates: vec!["A title".to_string()],
            lead_text: "lead".to_string(),
            body: "body".to_string(),
            summary: "summary".to_string(),
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.load().await.unwrap().is_none());

        cache.save(&article("first")).await.unwrap();
        cache.save(&article("second")).await.unwrap();
        let shared = cache.clone();
        assert_eq!(shared.load().await.unwrap().unwrap().keyword, "second");

        cache.clear().await.unwrap();
        assert!(shared.load().await.unwrap().is_none());
    }
}
