//! Deterministic stand-in data used when a provider has nothing better.

/// Ten typical ranking-article titles built around the keyword.
pub fn placeholder_titles(keyword: &str) -> Vec<String> {
    vec![
        format!("The complete guide to {} | a method anyone can follow", keyword),
        format!("[Latest] Top 10 {} recommendations", keyword),
        format!("What is {}? Pros and cons explained", keyword),
        format!("How to choose {} without failing | tips from a pro", keyword),
        format!("5 steps to succeed with {}", keyword),
        format!("{} basics | points you should know", keyword),
        format!("[Keep this] How to start {} | the complete manual", keyword),
        format!("{} reviews and reputation | does it really work?", keyword),
        format!("{} pitfalls and risks | and how to handle them", keyword),
        format!("{} FAQ | every question answered", keyword),
    ]
}

const SUGGESTION_SUFFIXES: [&str; 10] = [
    "meaning",
    "method",
    "how to",
    "recommended",
    "comparison",
    "ranking",
    "benefits",
    "drawbacks",
    "reviews",
    "reputation",
];

/// Padding for short related-keyword lists.
const RELATED_SUFFIXES: [&str; 5] = ["method", "how to", "recommended", "comparison", "ranking"];

pub fn placeholder_suggestions(keyword: &str) -> Vec<String> {
    SUGGESTION_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", keyword, suffix))
        .collect()
}

pub fn related_variations(keyword: &str) -> Vec<String> {
    RELATED_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", keyword, suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_titles_are_deterministic() {
        let titles = placeholder_titles("budget travel");
        assert_eq!(titles.len(), 10);
        assert!(titles.iter().all(|t| t.contains("budget travel")));
        assert_eq!(titles, placeholder_titles("budget travel"));
    }

    #[test]
    fn test_placeholder_suggestions() {
        let suggestions = placeholder_suggestions("diet");
        assert_eq!(suggestions.len(), 10);
        assert_eq!(suggestions[0], "diet meaning");
        assert_eq!(related_variations("diet")[1], "diet how to");
    }
}
