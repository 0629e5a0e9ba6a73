//! Read-only product catalog

use advisor_core::{ProductId, ProductRecord};

/// Search results are capped at this many products, in catalog order.
pub const MAX_SEARCH_RESULTS: usize = 3;

/// The read-only product catalog.
///
/// Built once from the source product list at session start; ids are unique
/// within the catalog (later duplicates are dropped).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductRecord>,
}

impl Catalog {
    /// Build a catalog, keeping the first record for each id.
    pub fn new(products: Vec<ProductRecord>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::with_capacity(products.len());

        for product in products {
            if seen.insert(product.id) {
                unique.push(product);
            } else {
                tracing::warn!(id = %product.id, name = %product.name, "duplicate product id dropped");
            }
        }

        Self { products: unique }
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by exact id.
    pub fn get(&self, id: ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product by case-insensitive name.
    pub fn by_name(&self, name: &str) -> Option<&ProductRecord> {
        let name = name.trim().to_lowercase();
        self.products
            .iter()
            .find(|p| p.name.to_lowercase() == name)
    }

    /// Case-insensitive substring search over name, strain, category,
    /// effects, benefits, and terpene names. Returns the first
    /// [`MAX_SEARCH_RESULTS`] matches in catalog order; no ranking.
    pub fn search(&self, query: &str) -> Vec<&ProductRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| Self::matches(p, &query))
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }

    /// Filter with an arbitrary predicate, capped at [`MAX_SEARCH_RESULTS`].
    pub fn filter<F>(&self, predicate: F) -> Vec<&ProductRecord>
    where
        F: Fn(&ProductRecord) -> bool,
    {
        self.products
            .iter()
            .filter(|p| predicate(p))
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }

    fn matches(product: &ProductRecord, query: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(query);

        contains(&product.name)
            || contains(product.strain.as_str())
            || contains(&product.category)
            || product.effects.iter().any(|e| contains(e))
            || product.benefits.iter().any(|b| contains(b))
            || product.terpenes.iter().any(|t| contains(&t.name))
    }
}
