//! Treatment catalog: static reference data for every chartable condition.
//!
//! Lookups return `Option`; an unknown id is never an error at the point of
//! use because the surrounding UI can hold stale ids.

mod search;

pub use search::*;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{AppliesTo, TreatmentCategory, TreatmentDefinition};

/// Catalog id of the crown treatment, which covers every coronal surface.
pub const CROWN_ID: &str = "crown";

/// Catalog errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate treatment id: {0}")]
    DuplicateId(String),

    #[error("Empty treatment id")]
    EmptyId,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Immutable lookup table of treatment definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentCatalog {
    definitions: Vec<TreatmentDefinition>,
    index: HashMap<String, usize>,
}

impl TreatmentCatalog {
    /// Build a catalog, rejecting empty or duplicate ids.
    pub fn new(definitions: Vec<TreatmentDefinition>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if definition.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if index.insert(definition.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(definition.id.clone()));
            }
        }
        Ok(Self { definitions, index })
    }

    /// The built-in clinic catalog. Prices are in céntimos.
    pub fn standard() -> Self {
        use AppliesTo::*;
        use TreatmentCategory::*;

        let definitions = vec![
            TreatmentDefinition::new("caries", "Caries", Pathology, 5_000, Surface),
            TreatmentDefinition::new("filling", "Filling", Operative, 8_000, Surface),
            TreatmentDefinition::new(CROWN_ID, "Crown", Rehabilitation, 45_000, Surface),
            TreatmentDefinition::new("endodontics", "Root canal", Endodontics, 35_000, Root),
            TreatmentDefinition::new("implant", "Implant", Rehabilitation, 120_000, WholeTooth),
            TreatmentDefinition::new("extraction", "Extraction", Surgery, 12_000, WholeTooth),
            TreatmentDefinition::new("missing", "Missing tooth", Pathology, 0, WholeTooth),
            TreatmentDefinition::new("unerupted", "Unerupted tooth", Other, 0, WholeTooth),
            TreatmentDefinition::new("healthy", "Healthy tooth", Other, 0, WholeTooth),
        ];

        let index = definitions
            .iter()
            .enumerate()
            .map(|(position, d)| (d.id.clone(), position))
            .collect();
        Self { definitions, index }
    }

    /// Look up a definition by id.
    pub fn lookup(&self, id: &str) -> Option<&TreatmentDefinition> {
        self.index.get(id).map(|&position| &self.definitions[position])
    }

    /// Price of a treatment, 0 when the id is unknown.
    pub fn price_of(&self, id: &str) -> u64 {
        self.lookup(id).map(|d| d.price).unwrap_or(0)
    }

    /// All definitions in catalog order.
    pub fn definitions(&self) -> &[TreatmentDefinition] {
        &self.definitions
    }

    /// Definitions in one category, in catalog order.
    pub fn by_category(&self, category: TreatmentCategory) -> Vec<&TreatmentDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Categories that have at least one definition, in display order.
    pub fn categories(&self) -> Vec<TreatmentCategory> {
        TreatmentCategory::ALL
            .into_iter()
            .filter(|c| self.definitions.iter().any(|d| d.category == *c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for TreatmentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
