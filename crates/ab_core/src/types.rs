use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What the caller asked for. Optional fields fall back to defaults derived
/// from the keyword; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl GenerationRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    pub fn with_call_to_action(mut self, call_to_action: impl Into<String>) -> Self {
        self.call_to_action = Some(call_to_action.into());
        self
    }

    /// Rejects requests without a usable keyword.
    pub fn validate(&self) -> Result<()> {
        if self.keyword.trim().is_empty() {
            return Err(Error::Validation("keyword is required".to_string()));
        }
        Ok(())
    }

    pub fn keyword(&self) -> &str {
        self.keyword.trim()
    }

    /// Explicit genre, or the first whitespace-separated token of the keyword.
    pub fn genre(&self) -> String {
        match non_empty(&self.genre) {
            Some(genre) => genre.to_string(),
            None => self
                .keyword()
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn theme(&self) -> String {
        match non_empty(&self.theme) {
            Some(theme) => theme.to_string(),
            None => format!("about {}", self.keyword()),
        }
    }

    pub fn authority(&self) -> &str {
        non_empty(&self.authority).unwrap_or_default()
    }

    pub fn call_to_action(&self) -> &str {
        non_empty(&self.call_to_action).unwrap_or_default()
    }
}

/// Example-article counts per intent label. Informational only; they are not
/// required to follow the a > b > c ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDistribution {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

/// Three mutually exclusive readings of why people search the keyword,
/// ranked by declared importance (`a` first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    pub a: String,
    pub b: String,
    pub c: String,
    pub distribution: IntentDistribution,
}

impl SearchIntent {
    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty() && self.c.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    pub subheadings: Vec<String>,
}

impl OutlineSection {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            subheadings: Vec::new(),
        }
    }

    pub fn with_subheadings<I, S>(mut self, subheadings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subheadings = subheadings.into_iter().map(Into::into).collect();
        self
    }
}

/// Article sections in output order.
pub type Outline = Vec<OutlineSection>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArticle {
    pub keyword: String,
    pub search_intent: SearchIntent,
    pub outline: Outline,
    pub title_candidates: Vec<String>,
    pub lead_text: String,
    pub body: String,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    KeywordResearch,
    SearchIntent,
    Outline,
    Titles,
    Lead,
    Body,
    Summary,
    Complete,
}

impl GenerationStep {
    pub const ALL: [GenerationStep; 8] = [
        GenerationStep::KeywordResearch,
        GenerationStep::SearchIntent,
        GenerationStep::Outline,
        GenerationStep::Titles,
        GenerationStep::Lead,
        GenerationStep::Body,
        GenerationStep::Summary,
        GenerationStep::Complete,
    ];

    /// 1-based position; `Complete` is 8.
    pub fn ordinal(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default() + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStep::KeywordResearch => "keyword_research",
            GenerationStep::SearchIntent => "search_intent",
            GenerationStep::Outline => "outline",
            GenerationStep::Titles => "titles",
            GenerationStep::Lead => "lead",
            GenerationStep::Body => "body",
            GenerationStep::Summary => "summary",
            GenerationStep::Complete => "complete",
        }
    }
}

impl std::fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
