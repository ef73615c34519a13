//! Extraction of structured data from free-form model replies.
//!
//! Every parser works line by line and tolerates missing sections: anything it
//! cannot find keeps its default value. Matching rules live here so they can be
//! tightened without touching the pipeline.

use ab_core::{Outline, OutlineSection, SearchIntent};
use lazy_static::lazy_static;
use regex::Regex;

/// Most title candidates kept from a reply.
pub const MAX_TITLE_CANDIDATES: usize = 5;

/// Appended to every rendered search-intent block.
pub const INTENT_RANKING_SENTENCE: &str = "Search intent importance is ranked a > b > c.";

lazy_static! {
    static ref H2_LINE: Regex = Regex::new(r"^h2[：:]\s*(.+)").unwrap();
    static ref H3_LINE: Regex = Regex::new(r"^\s*h3[：:]\s*(.+)").unwrap();
    static ref DIGITS: Regex = Regex::new(r"[0-9]+").unwrap();
}

#[derive(Clone, Copy)]
enum Label {
    A,
    B,
    C,
}

impl Label {
    const ALL: [Label; 3] = [Label::A, Label::B, Label::C];

    fn prefixes(self) -> [&'static str; 2] {
        match self {
            Label::A => ["a:", "a："],
            Label::B => ["b:", "b："],
            Label::C => ["c:", "c："],
        }
    }

    fn count_markers(self) -> [&'static str; 2] {
        match self {
            Label::A => ["[a] article count:", "【a】該当記事数："],
            Label::B => ["[b] article count:", "【b】該当記事数："],
            Label::C => ["[c] article count:", "【c】該当記事数："],
        }
    }
}

fn label_text(intent: &mut SearchIntent, label: Label) -> &mut String {
    match label {
        Label::A => &mut intent.a,
        Label::B => &mut intent.b,
        Label::C => &mut intent.c,
    }
}

fn label_count(intent: &mut SearchIntent, label: Label) -> &mut u32 {
    match label {
        Label::A => &mut intent.distribution.a,
        Label::B => &mut intent.distribution.b,
        Label::C => &mut intent.distribution.c,
    }
}

fn first_number(line: &str) -> u32 {
    DIGITS
        .find(line)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn parse_search_intent(text: &str) -> SearchIntent {
    let mut intent = SearchIntent::default();

    'lines: for line in text.lines() {
        let trimmed = line.trim();

        for label in Label::ALL {
            for prefix in label.prefixes() {
                if let Some(rest) = trimmed.strip_prefix(prefix) {
                    *label_text(&mut intent, label) = rest.trim().to_string();
                    continue 'lines;
                }
            }
        }

        for label in Label::ALL {
            if label.count_markers().iter().any(|marker| line.contains(marker)) {
                *label_count(&mut intent, label) = first_number(line);
                continue 'lines;
            }
        }
    }

    if intent.is_empty() {
        tracing::warn!("No search intent labels found in model reply");
    }
    intent
}

pub fn parse_outline(text: &str) -> Outline {
    let mut outline = Vec::new();
    let mut current: Option<OutlineSection> = None;

    for line in text.lines() {
        if let Some(caps) = H2_LINE.captures(line) {
            if let Some(section) = current.take() {
                outline.push(section);
            }
            current = Some(OutlineSection::new(caps[1].trim()));
        } else if let Some(caps) = H3_LINE.captures(line) {
            // h3 lines before the first h2 have nowhere to go
            if let Some(section) = current.as_mut() {
                section.subheadings.push(caps[1].trim().to_string());
            }
        }
    }

    if let Some(section) = current {
        outline.push(section);
    }

    tracing::debug!(sections = outline.len(), "Parsed outline");
    outline
}

pub fn parse_title_candidates(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .take(MAX_TITLE_CANDIDATES)
        .map(str::to_string)
        .collect()
}

/// `a:`/`b:`/`c:` lines plus the ranking sentence, as fed back into prompts.
pub fn format_search_intent(intent: &SearchIntent) -> String {
    format!(
        "a:{}\nb:{}\nc:{}\n{}",
        intent.a, intent.b, intent.c, INTENT_RANKING_SENTENCE
    )
}

pub fn format_section(section: &OutlineSection) -> String {
    let mut text = format!("h2：{}", section.heading);
    for sub in &section.subheadings {
        text.push_str("\n  h3：");
        text.push_str(sub);
    }
    text
}

pub fn format_outline(outline: &[OutlineSection]) -> String {
    outline
        .iter()
        .map(format_section)
        .collect::<Vec<_>>()
        .join("\n\n")
}
