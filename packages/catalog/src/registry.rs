//! In-memory model registry backed by the embedded catalog data.

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::types::{ModelCategory, ModelEntry};

/// One catalog section as stored in `catalog.json`.
#[derive(Debug, Clone, Deserialize)]
struct CatalogSection {
    category: ModelCategory,
    models: Vec<ModelEntry>,
}

/// The model catalog: an ordered list of sections, each holding its entries
/// in declaration order. Section order is fixed (see [`ModelCategory::ALL`])
/// so that first-match resolution is deterministic.
#[derive(Debug)]
pub struct ModelCatalog {
    sections: Vec<CatalogSection>,
}

lazy_static! {
    /// The full catalog, parsed once from the embedded data.
    pub static ref CATALOG: ModelCatalog = ModelCatalog::load();
}

impl ModelCatalog {
    fn load() -> Self {
        let sections: Vec<CatalogSection> =
            serde_json::from_str(include_str!("catalog.json"))
                .expect("embedded catalog data is valid");
        Self { sections }
    }

    /// Resolve an identifier to a catalog entry.
    ///
    /// Matches if the identifier equals an entry's remote id or its catalog
    /// key. Returns the first match scanning sections in their declared
    /// order; that order is the tie-break when the same remote id appears
    /// under more than one key (e.g. "meta/musicgen").
    pub fn resolve(&self, identifier: &str) -> Option<&ModelEntry> {
        self.sections
            .iter()
            .flat_map(|s| s.models.iter())
            .find(|m| m.id == identifier || m.key == identifier)
    }

    /// Entries in a given category, in declaration order.
    pub fn category(&self, category: ModelCategory) -> &[ModelEntry] {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.models.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over all sections in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelCategory, &[ModelEntry])> {
        self.sections
            .iter()
            .map(|s| (s.category, s.models.as_slice()))
    }

    /// All entries supporting a capability tag, in catalog order.
    pub fn models_by_capability(&self, capability: &str) -> Vec<&ModelEntry> {
        self.sections
            .iter()
            .flat_map(|s| s.models.iter())
            .filter(|m| m.capabilities.iter().any(|c| c == capability))
            .collect()
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.models.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
