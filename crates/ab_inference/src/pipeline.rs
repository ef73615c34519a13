//! The seven-step article generation pipeline.
//!
//! Steps run strictly in order and each consumes what the previous ones
//! produced: keyword research, search-intent analysis, outline, title
//! candidates, lead, body (one call per outline section) and summary. The
//! first failure aborts the run; nothing is retried and no partial article is
//! returned.

use std::sync::Arc;

use ab_core::{
    CompletionModel, GeneratedArticle, GenerationRequest, GenerationStep, KeywordSource, Outline,
    OutlineSection, Result, SearchIntent,
};
use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, Instrument};

use crate::parsers::{
    format_outline, format_search_intent, format_section, parse_outline, parse_search_intent,
    parse_title_candidates,
};
use crate::templates::{placeholders as ph, TemplateKind, TemplateStore};

/// Heading text that marks the closing section of the shipped outline prompt.
pub const DEFAULT_CLOSING_MARKER: &str = "Summary";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Sections whose heading contains this text are left out of the body;
    /// the summary step writes them instead.
    pub closing_marker: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            closing_marker: DEFAULT_CLOSING_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArticlePipeline {
    templates: Arc<TemplateStore>,
    options: PipelineOptions,
    progress: Option<UnboundedSender<GenerationStep>>,
}

impl ArticlePipeline {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self {
            templates,
            options: PipelineOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Receives each step as it completes, ending with [`GenerationStep::Complete`].
    pub fn with_progress(mut self, progress: UnboundedSender<GenerationStep>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn report(&self, step: GenerationStep) {
        if step != GenerationStep::Complete {
            info!("✨ Step {}/7 done: {}", step.ordinal(), step);
        }
        if let Some(progress) = &self.progress {
            // A dropped receiver only means nobody is watching.
            let _ = progress.send(step);
        }
    }

    /// Runs all seven steps for `request`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        source: &dyn KeywordSource,
        model: &dyn CompletionModel,
    ) -> Result<GeneratedArticle> {
        request.validate()?;
        let keyword = request.keyword();
        let span = tracing::info_span!("generate_article", keyword = %keyword, model = model.name());

        async move {
            info!("📝 Generating article for '{}'", keyword);

            let titles = self.research_keyword(source, keyword).await?;
            self.report(GenerationStep::KeywordResearch);

            let search_intent = self.analyze_search_intent(model, &titles).await?;
            self.report(GenerationStep::SearchIntent);

            let outline = self
                .generate_outline(model, keyword, &request.genre(), &search_intent)
                .await?;
            self.report(GenerationStep::Outline);

            let title_candidates = self.generate_titles(model, &request.theme()).await?;
            self.report(GenerationStep::Titles);

            let lead_text = self
                .generate_lead(model, keyword, &search_intent, &outline, request.authority())
                .await?;
            self.report(GenerationStep::Lead);

            let body = self
                .generate_body(model, keyword, &search_intent, &outline)
                .await?;
            self.report(GenerationStep::Body);

            let summary = self
                .generate_summary(model, keyword, &search_intent, &outline, request.call_to_action())
                .await?;
            self.report(GenerationStep::Summary);

            let article = GeneratedArticle {
                keyword: keyword.to_string(),
                search_intent,
                outline,
                title_candidates,
                lead_text,
                body,
                summary,
                generated_at: Utc::now(),
            };
            self.report(GenerationStep::Complete);
            info!("✅ Article for '{}' complete", keyword);
            Ok(article)
        }
        .instrument(span)
        .await
    }

    #[instrument(skip_all, name = "keyword_research")]
    pub async fn research_keyword(
        &self,
        source: &dyn KeywordSource,
        keyword: &str,
    ) -> Result<Vec<String>> {
        info!("🔍 Fetching candidate titles via {}", source.name());
        let titles = source.fetch_candidate_titles(keyword).await?;
        info!("Found {} candidate titles", titles.len());
        Ok(titles)
    }

    #[instrument(skip_all, name = "search_intent")]
    pub async fn analyze_search_intent(
        &self,
        model: &dyn CompletionModel,
        titles: &[String],
    ) -> Result<SearchIntent> {
        let prompt = self.templates.render_title_list(titles);
        let reply = model.complete(&prompt).await?;
        Ok(parse_search_intent(&reply))
    }

    #[instrument(skip_all, name = "outline")]
    pub async fn generate_outline(
        &self,
        model: &dyn CompletionModel,
        keyword: &str,
        genre: &str,
        search_intent: &SearchIntent,
    ) -> Result<Outline> {
        let intent_text = format_search_intent(search_intent);
        let prompt = self.templates.render(
            TemplateKind::Outline,
            &[
                (ph::GENRE, genre),
                (ph::KEYWORD, keyword),
                (ph::SEARCH_INTENT, &intent_text),
            ],
        );
        let reply = model.complete(&prompt).await?;
        let outline = parse_outline(&reply);
        if outline.is_empty() {
            tracing::warn!("⚠️ Outline reply contained no h2 headings");
        }
        info!("🏗️ Outline has {} sections", outline.len());
        Ok(outline)
    }

    #[instrument(skip_all, name = "titles")]
    pub async fn generate_titles(
        &self,
        model: &dyn CompletionModel,
        theme: &str,
    ) -> Result<Vec<String>> {
        let prompt = self.templates.render(TemplateKind::Titles, &[(ph::THEME, theme)]);
        let reply = model.complete(&prompt).await?;
        Ok(parse_title_candidates(&reply))
    }

    #[instrument(skip_all, name = "lead")]
    pub async fn generate_lead(
        &self,
        model: &dyn CompletionModel,
        keyword: &str,
        search_intent: &SearchIntent,
        outline: &[OutlineSection],
        authority: &str,
    ) -> Result<String> {
        let intent_text = format_search_intent(search_intent);
        let outline_text = format_outline(outline);
        let prompt = self.templates.render(
            TemplateKind::Lead,
            &[
                (ph::KEYWORD, keyword),
                (ph::SEARCH_INTENT, &intent_text),
                (ph::AUTHORITY, authority),
                (ph::OUTLINE, &outline_text),
            ],
        );
        model.complete(&prompt).await
    }

    pub fn is_closing_section(&self, section: &OutlineSection) -> bool {
        !self.options.closing_marker.is_empty()
            && section.heading.contains(&self.options.closing_marker)
    }

    /// One call per section, in outline order, skipping the closing section.
    #[instrument(skip_all, name = "body")]
    pub async fn generate_body(
        &self,
        model: &dyn CompletionModel,
        keyword: &str,
        search_intent: &SearchIntent,
        outline: &[OutlineSection],
    ) -> Result<String> {
        let intent_text = format_search_intent(search_intent);
        let outline_text = format_outline(outline);
        let mut parts = Vec::with_capacity(outline.len());

        for (i, section) in outline.iter().enumerate() {
            if self.is_closing_section(section) {
                info!("⏭️ Skipping closing section: {}", section.heading);
                continue;
            }

            info!("📄 Writing section {}/{}: {}", i + 1, outline.len(), section.heading);
            let section_text = format_section(section);
            let prompt = self.templates.render(
                TemplateKind::Body,
                &[
                    (ph::KEYWORD, keyword),
                    (ph::SEARCH_INTENT, &intent_text),
                    (ph::OUTLINE, &outline_text),
                    (ph::TARGET_SECTION, &section_text),
                ],
            );
            let text = model.complete(&prompt).await?;
            tracing::debug!(section = %section.heading, chars = text.chars().count(), "Section written");
            parts.push(text);
        }

        info!("📝 Body written from {} sections", parts.len());
        Ok(parts.join("\n\n"))
    }

    #[instrument(skip_all, name = "summary")]
    pub async fn generate_summary(
        &self,
        model: &dyn CompletionModel,
        keyword: &str,
        search_intent: &SearchIntent,
        outline: &[OutlineSection],
        call_to_action: &str,
    ) -> Result<String> {
        let intent_text = format_search_intent(search_intent);
        let outline_text = format_outline(outline);
        let prompt = self.templates.render(
            TemplateKind::Summary,
            &[
                (ph::KEYWORD, keyword),
                (ph::SEARCH_INTENT, &intent_text),
                (ph::CALL_TO_ACTION, call_to_action),
                (ph::OUTLINE, &outline_text),
            ],
        );
        model.complete(&prompt).await
    }
}
