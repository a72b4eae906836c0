//! Reference code catalog
//!
//! The catalog is the fixed knowledge base every scorer reads from. It is
//! validated once at construction (unique codes, at least one keyword per
//! entry) and never mutated afterwards, so a single instance can be shared
//! across any number of concurrent requests.

pub mod builtin;
pub mod types;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::CatalogLoadError;
use crate::text::basic_normalize;
use crate::TARGET_CATALOG;

pub use builtin::builtin_records;
pub use types::{CodeEntry, CodeRecord, Specialty};

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CodeEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and freeze a table of records, preserving their order.
    pub fn from_records<I>(records: I) -> Result<Self, CatalogLoadError>
    where
        I: IntoIterator<Item = CodeRecord>,
    {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (position, record) in records.into_iter().enumerate() {
            let code = record.code.trim().to_string();
            if code.is_empty() {
                return Err(CatalogLoadError::EmptyCode(position));
            }
            if index.contains_key(&code) {
                return Err(CatalogLoadError::DuplicateCode(code));
            }

            let description = record.description.trim().to_string();
            if description.is_empty() {
                return Err(CatalogLoadError::EmptyDescription(code));
            }

            let keywords = distinct_keywords(&record.keywords);
            if keywords.is_empty() {
                return Err(CatalogLoadError::EmptyKeywords(code));
            }

            debug!(
                target: TARGET_CATALOG,
                "Loaded {} ({}) with {} keywords", code, record.specialty, keywords.len()
            );

            index.insert(code.clone(), entries.len());
            entries.push(CodeEntry::new(code, description, record.specialty, keywords));
        }

        info!(target: TARGET_CATALOG, "Catalog ready with {} codes", entries.len());

        Ok(Catalog { entries, index })
    }

    /// The ICD-10 subset bundled with the crate
    pub fn builtin() -> Result<Self, CatalogLoadError> {
        Self::from_records(builtin_records())
    }

    /// Parse a JSON array of `{code, description, specialty, keywords}` rows.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogLoadError> {
        let records: Vec<CodeRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        info!(target: TARGET_CATALOG, "Loading catalog from {}", path.display());
        let json = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, code: &str) -> Option<&CodeEntry> {
        self.index.get(code).map(|&position| &self.entries[position])
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CodeEntry;
    type IntoIter = std::slice::Iter<'a, CodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Trim, drop blanks and collapse keywords that normalize identically,
// keeping the first spelling.
fn distinct_keywords(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| {
            let normalized = basic_normalize(keyword);
            !normalized.is_empty() && seen.insert(normalized)
        })
        .map(str::to_string)
        .collect()
}
