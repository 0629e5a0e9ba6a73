//! Knowledge index: reduced catalog projection for outbound agent context

use advisor_core::{ProductId, ProductRecord, StrainType, Terpene};
use serde::{Deserialize, Serialize};

use crate::Catalog;

/// Character budget for serialized catalog context embedded in outbound
/// payloads (prompts, remote-agent requests).
pub const DEFAULT_CONTEXT_BUDGET: usize = 1000;

/// Reduced projection of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductKnowledge {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub strain: StrainType,
    pub thc: String,
    pub cbd: String,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub terpenes: Vec<Terpene>,
    #[serde(default)]
    pub flavors: Vec<String>,
}

impl From<&ProductRecord> for ProductKnowledge {
    fn from(product: &ProductRecord) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            strain: product.strain,
            thc: product.thc.clone(),
            cbd: product.cbd.clone(),
            effects: product.effects.clone(),
            benefits: product.benefits.clone(),
            terpenes: product.terpenes.clone(),
            flavors: product.flavors.clone(),
        }
    }
}

/// Read-only projection of the whole catalog, rebuilt at session start.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeIndex {
    entries: Vec<ProductKnowledge>,
}

impl KnowledgeIndex {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            entries: catalog.products().iter().map(ProductKnowledge::from).collect(),
        }
    }

    pub fn entries(&self) -> &[ProductKnowledge] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The longest entry prefix whose compact JSON serialization stays
    /// within `budget` characters. Outbound context never embeds more than
    /// this.
    pub fn within_budget(&self, budget: usize) -> &[ProductKnowledge] {
        let mut end = 0;

        for count in 1..=self.entries.len() {
            match serde_json::to_string(&self.entries[..count]) {
                Ok(json) if json.chars().count() <= budget => end = count,
                Ok(_) => break,
                Err(e) => {
                    tracing::warn!("knowledge serialization failed: {}", e);
                    break;
                }
            }
        }

        &self.entries[..end]
    }
}
