use std::path::PathBuf;

/// Raised while building a [`Catalog`](crate::catalog::Catalog). Construction is
/// all-or-nothing: no partially loaded catalog is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("duplicate code in catalog: {0}")]
    DuplicateCode(String),
    #[error("catalog entry {0} has no keywords")]
    EmptyKeywords(String),
    #[error("catalog entry at position {0} has an empty code")]
    EmptyCode(usize),
    #[error("catalog entry {0} has an empty description")]
    EmptyDescription(String),
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("entity model request failed: {0}")]
    Model(String),
    #[error("unusable entity model response: {0}")]
    Response(String),
}

pub type RecommendResult<T> = std::result::Result<T, RecommendError>;
