pub mod error;
pub mod keywords;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use keywords::KeywordSource;
pub use models::CompletionModel;
pub use storage::ResultCache;
pub use types::{
    GeneratedArticle, GenerationRequest, GenerationStep, IntentDistribution, Outline,
    OutlineSection, SearchIntent,
};
