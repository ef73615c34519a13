use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ab_core::{Error, GeneratedArticle, Result, ResultCache};
use async_trait::async_trait;
use tokio::fs;

/// File name used when no path is configured.
pub const DEFAULT_CACHE_FILE: &str = "last_article.json";

/// Keeps the last article as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}

#[async_trait]
impl ResultCache for FileCache {
    async fn load(&self) -> Result<Option<GeneratedArticle>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            Error::Storage(format!("corrupt cache file {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, article: &GeneratedArticle) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(article)?;
        fs::write(&self.path, json).await?;
        tracing::debug!("💾 Saved article to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
