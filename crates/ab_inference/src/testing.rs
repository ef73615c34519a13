//! Test doubles for the pipeline's collaborators.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ab_core::{CompletionModel, Error, KeywordSource, Result};
use async_trait::async_trait;

use crate::templates::{TemplateKind, TemplateStore};

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Answers prompts by substring rules and records every prompt it sees.
/// The most recently added matching rule wins; unmatched prompts get `""`.
pub struct ScriptedModel {
    rules: Vec<(String, Responder)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, needle: &str, reply: &str) -> Self {
        let reply = reply.to_string();
        self.rule(needle, Box::new(move |_| Ok(reply.clone())))
    }

    pub fn respond_with<F>(self, needle: &str, reply: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rule(needle, Box::new(move |prompt| Ok(reply(prompt))))
    }

    pub fn fail(self, needle: &str, message: &str) -> Self {
        let message = message.to_string();
        self.rule(needle, Box::new(move |_| Err(Error::ModelCall(message.clone()))))
    }

    fn rule(mut self, needle: &str, responder: Responder) -> Self {
        self.rules.push((needle.to_string(), responder));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedModel")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.rules.iter().rev().find(|(needle, _)| prompt.contains(needle.as_str())) {
            Some((_, responder)) => responder(prompt),
            None => Ok(String::new()),
        }
    }
}

/// Keyword source with fixed answers that counts how often it is asked.
pub struct CountingSource {
    titles: Vec<String>,
    failure: Option<String>,
    title_calls: AtomicUsize,
    suggestion_calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            failure: None,
            title_calls: AtomicUsize::new(0),
            suggestion_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn title_calls(&self) -> usize {
        self.title_calls.load(Ordering::SeqCst)
    }

    pub fn suggestion_calls(&self) -> usize {
        self.suggestion_calls.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<Vec<String>> {
        match &self.failure {
            Some(message) => Err(Error::KeywordProvider(message.clone())),
            None => Ok(self.titles.clone()),
        }
    }
}

#[async_trait]
impl KeywordSource for CountingSource {
    fn name(&self) -> &str {
        "Counting"
    }

    async fn fetch_candidate_titles(&self, _keyword: &str) -> Result<Vec<String>> {
        self.title_calls.fetch_add(1, Ordering::SeqCst);
        self.answer()
    }

    async fn fetch_suggestions(&self, _keyword: &str) -> Result<Vec<String>> {
        self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
        self.answer()
    }

    async fn fetch_related_keywords(&self, _keyword: &str) -> Result<Vec<String>> {
        self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
        self.answer()
    }
}

/// Minimal templates whose first line names the step, so scripted models
/// can tell the steps apart.
pub fn test_templates() -> TemplateStore {
    TemplateStore::from_templates([
        (
            TemplateKind::SearchIntent,
            "STEP intent\n# Article titles\n- [Title of article 1]\n- [Title of article 2]\nClassify the intent.",
        ),
        (
            TemplateKind::Outline,
            "STEP outline\ngenre={genre}\nkeyword={keyword}\n{search_intent}",
        ),
        (TemplateKind::Titles, "STEP titles\ntheme={theme}"),
        (
            TemplateKind::Lead,
            "STEP lead\nkeyword={keyword}\n{search_intent}\nauthority={authority}\n{outline}",
        ),
        (
            TemplateKind::Body,
            "STEP body\nkeyword={keyword}\n{search_intent}\noutline:\n{outline}\ntarget={target_section}",
        ),
        (
            TemplateKind::Summary,
            "STEP summary\nkeyword={keyword}\n{search_intent}\ncta={call_to_action}\n{outline}",
        ),
    ])
}
