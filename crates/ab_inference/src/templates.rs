//! Prompt templates, loaded once at startup and shared read-only.
//!
//! Templates carry `{name}` placeholders. A template that failed to load is
//! kept as empty text; rendering it yields an empty prompt and a warning rather
//! than an error.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Placeholder names understood by the shipped templates.
pub mod placeholders {
    pub const KEYWORD: &str = "keyword";
    pub const GENRE: &str = "genre";
    pub const SEARCH_INTENT: &str = "search_intent";
    pub const THEME: &str = "theme";
    pub const AUTHORITY: &str = "authority";
    pub const OUTLINE: &str = "outline";
    pub const TARGET_SECTION: &str = "target_section";
    pub const CALL_TO_ACTION: &str = "call_to_action";
}

/// Header in the search-intent template under which candidate titles go.
pub const TITLE_LIST_HEADER: &str = "# Article titles";
const TITLE_LIST_HEADERS: [&str; 2] = [TITLE_LIST_HEADER, "#記事タイトル"];

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    static ref TITLE_SLOT: Regex = Regex::new(
        r"(?m)^[ \t]*(?:[-*・][ \t]*)?(?:\[Title of article \d+\]|【「記事\d+」のタイトルが入ります】)[ \t]*(?:\r?\n)?"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    SearchIntent,
    Outline,
    Titles,
    Lead,
    Body,
    Summary,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::SearchIntent,
        TemplateKind::Outline,
        TemplateKind::Titles,
        TemplateKind::Lead,
        TemplateKind::Body,
        TemplateKind::Summary,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::SearchIntent => "1.search_intent.txt",
            TemplateKind::Outline => "2.outline.txt",
            TemplateKind::Titles => "3.titles.txt",
            TemplateKind::Lead => "4.lead.txt",
            TemplateKind::Body => "5.body.txt",
            TemplateKind::Summary => "6.summary.txt",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<TemplateKind, String>,
}

impl TemplateStore {
    /// Reads every template file from `dir`. Missing or unreadable files are
    /// logged and left empty.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        tracing::info!("📁 Loading prompt templates from {}", dir.display());

        let mut templates = HashMap::new();
        for kind in TemplateKind::ALL {
            let path = dir.join(kind.file_name());
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::info!("✅ Loaded {} ({} chars)", kind.file_name(), content.chars().count());
                    templates.insert(kind, content);
                }
                Err(e) => {
                    tracing::warn!("❌ Could not read template {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("📄 {} of {} templates loaded", templates.len(), TemplateKind::ALL.len());
        Self { templates }
    }

    pub fn from_templates<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = (TemplateKind, S)>,
        S: Into<String>,
    {
        Self {
            templates: templates
                .into_iter()
                .map(|(kind, text)| (kind, text.into()))
                .collect(),
        }
    }

    /// Raw template text, empty when the template was not loaded.
    pub fn get(&self, kind: TemplateKind) -> &str {
        self.templates.get(&kind).map(String::as_str).unwrap_or_default()
    }

    pub fn loaded(&self) -> usize {
        self.templates.values().filter(|t| !t.is_empty()).count()
    }

    pub fn missing(&self) -> Vec<TemplateKind> {
        TemplateKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_empty())
            .collect()
    }

    pub fn render(&self, kind: TemplateKind, substitutions: &[(&str, &str)]) -> String {
        let template = self.get(kind);
        if template.is_empty() {
            tracing::warn!("⚠️ Template {} is empty; sending an empty prompt", kind.file_name());
            return String::new();
        }
        render(template, substitutions)
    }

    /// Search-intent prompt: slot lines removed, titles listed under the header.
    pub fn render_title_list(&self, titles: &[String]) -> String {
        let template = self.get(TemplateKind::SearchIntent);
        if template.is_empty() {
            tracing::warn!(
                "⚠️ Template {} is empty; sending an empty prompt",
                TemplateKind::SearchIntent.file_name()
            );
            return String::new();
        }
        insert_title_list(template, titles)
    }
}

/// Replaces every `{name}` whose name appears in `substitutions`, in one pass.
/// Substituted values are not scanned again and unknown placeholders stay.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match substitutions.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

pub fn insert_title_list(template: &str, titles: &[String]) -> String {
    let list = titles
        .iter()
        .map(|title| format!("- {}", title))
        .collect::<Vec<_>>()
        .join("\n");

    let cleaned = TITLE_SLOT.replace_all(template, "");

    match TITLE_LIST_HEADERS.iter().find(|header| cleaned.contains(**header)) {
        Some(header) => cleaned.replacen(*header, &format!("{}\n{}", header, list), 1),
        None => {
            tracing::debug!("Title header missing from template; appending title list");
            format!("{}\n\n{}\n{}", cleaned.trim_end(), TITLE_LIST_HEADER, list)
        }
    }
}
