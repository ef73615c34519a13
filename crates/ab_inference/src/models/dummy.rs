use std::fmt;

use ab_core::{CompletionModel, Result};

/// Offline stand-in that answers every prompt with the same canned text.
/// The reply is shaped so each parser finds something to extract, which is
/// enough to exercise the whole pipeline without credentials.
pub struct DummyModel;

const CANNED_REPLY: &str = "\
a: Learn the basics
b: Compare the options
c: Find the cheapest way to start
[a] article count: 5
[b] article count: 3
[c] article count: 2
h2：Getting started
  h3：What it is
  h3：Who it is for
h2：Choosing well
  h3：What to compare
h2：Summary";

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!(prompt_length = prompt.len(), "Dummy model answering");
        Ok(CANNED_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{parse_outline, parse_search_intent};

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let reply = model.complete("anything").await.unwrap();

        let intent = parse_search_intent(&reply);
        assert_eq!(intent.a, "Learn the basics");
        assert_eq!(intent.distribution.a, 5);

        let outline = parse_outline(&reply);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].subheadings.len(), 2);
        assert_eq!(outline[2].heading, "Summary");
    }
}
