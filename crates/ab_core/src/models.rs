use async_trait::async_trait;
use std::fmt;

use crate::Result;

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Send a rendered prompt and return the generated text.
    ///
    /// Every provider failure surfaces as [`crate::Error::ModelCall`] with the
    /// upstream message left intact.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
