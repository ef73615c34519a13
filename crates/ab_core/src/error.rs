use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The request itself is unusable (e.g. no keyword).
    #[error("{0}")]
    Validation(String),

    /// A mandatory credential is missing.
    #[error("{0}")]
    Auth(String),

    /// The completion call failed. The message carries the upstream text verbatim.
    #[error("Article generation failed: {0}")]
    ModelCall(String),

    #[error("Keyword provider error: {0}")]
    KeywordProvider(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Errors detected before any external call is made.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_call_keeps_upstream_text() {
        let err = Error::ModelCall("400 Bad Request: Your credit balance is too low".to_string());
        assert!(err.to_string().contains("credit balance is too low"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(Error::Validation("keyword is required".to_string()).is_client_error());
        assert!(Error::Auth("api key is required".to_string()).is_client_error());
        assert!(!Error::Storage("disk full".to_string()).is_client_error());
    }
}
