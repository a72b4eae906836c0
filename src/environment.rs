use std::env;
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::config::ScoringPolicy;
use crate::error::{CatalogLoadError, RecommendResult};
use crate::recommender::IcdRecommender;

pub const CATALOG_PATH_VAR: &str = "ICD_CATALOG_PATH";

/// Path from `ICD_CATALOG_PATH`, if set and not blank.
pub fn catalog_path() -> Option<PathBuf> {
    env::var(CATALOG_PATH_VAR)
        .ok()
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// The catalog named by `ICD_CATALOG_PATH`, or the built-in one.
pub fn load_catalog() -> Result<Catalog, CatalogLoadError> {
    match catalog_path() {
        Some(path) => Catalog::from_path(path),
        None => Catalog::builtin(),
    }
}

/// Engine built from the environment: catalog location and scoring policy.
pub fn recommender_from_env() -> RecommendResult<IcdRecommender> {
    let catalog = load_catalog()?;
    let policy = ScoringPolicy::from_env()?;
    IcdRecommender::new(catalog, Default::default(), policy)
}
