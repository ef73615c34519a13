use std::fmt;

/// Substrings that mark a credential copied from an example config.
const PLACEHOLDER_MARKERS: [&str; 3] = ["your_", "placeholder", "example"];

/// Which keyword provider serves a request. Decided once, where the
/// credential enters the system.
#[derive(Clone, PartialEq, Eq)]
pub enum KeywordProvider {
    /// Credentialed keyword-data API.
    Primary(String),
    /// Free public suggestion endpoint.
    Fallback,
}

impl KeywordProvider {
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential.map(str::trim) {
            Some(key) if key.is_empty() => Self::Fallback,
            Some(key) if is_placeholder(key) => {
                tracing::warn!(
                    "⚠️ Keyword API key looks like a placeholder ({}...); using the free provider",
                    key.chars().take(8).collect::<String>()
                );
                Self::Fallback
            }
            Some(key) => Self::Primary(key.to_string()),
            None => Self::Fallback,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary(_))
    }
}

pub fn is_placeholder(credential: &str) -> bool {
    let lowered = credential.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| lowered.contains(marker))
}

impl fmt::Debug for KeywordProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(_) => f.debug_tuple("Primary").field(&"<redacted>").finish(),
            Self::Fallback => f.write_str("Fallback"),
        }
    }
}
