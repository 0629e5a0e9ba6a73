//! Fallback responder
//!
//! Answers turns that carry no explicit tool intent. A fixed, ordered list
//! of keyword buckets is scanned top to bottom; the first bucket whose
//! keywords intersect the query wins and contributes a canned lead-in plus
//! a bucket-specific catalog filter. Queries matching no bucket get a
//! random sample drawn from an injectable, seedable RNG.

use std::sync::Arc;

use advisor_catalog::{Catalog, MAX_SEARCH_RESULTS};
use advisor_core::{ProductRecord, StrainType};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Canned reply with the products to display alongside it.
#[derive(Debug, Clone)]
pub struct FallbackReply {
    /// Lead-in sentence
    pub message: String,
    /// Filtered products, at most [`MAX_SEARCH_RESULTS`]
    pub products: Vec<ProductRecord>,
}

struct Bucket {
    keywords: &'static [&'static str],
    lead_in: &'static str,
    filter: fn(&ProductRecord) -> bool,
}

const BUCKETS: &[Bucket] = &[
    Bucket {
        keywords: &["schmerz", "weh", "pain"],
        lead_in: "Bei Schmerzen können dir diese Produkte helfen:",
        filter: |p| tags_contain(p, &["schmerz", "pain"]),
    },
    Bucket {
        keywords: &["schlaf", "müde", "sleep", "insomnia"],
        lead_in: "Für besseren Schlaf empfehle ich dir diese Produkte:",
        filter: |p| tags_contain(p, &["schlaf", "sleep"]),
    },
    Bucket {
        keywords: &["angst", "stress", "unruhe", "anxiety"],
        lead_in: "Zum Runterkommen bei Angst und Stress passen diese Produkte:",
        filter: |p| tags_contain(p, &["angst", "stress", "beruhig", "calm"]),
    },
    Bucket {
        keywords: &["appetit", "hunger", "appetite"],
        lead_in: "Diese Produkte können den Appetit anregen:",
        filter: |p| tags_contain(p, &["appetit", "appetite"]),
    },
    Bucket {
        keywords: &["thc"],
        lead_in: "Hier sind unsere THC-stärksten Produkte:",
        filter: |p| p.thc_percent().is_some_and(|v| v >= 15.0),
    },
    Bucket {
        keywords: &["cbd"],
        lead_in: "Wenn du auf CBD setzt, schau dir diese Produkte an:",
        filter: |p| p.cbd_percent().is_some_and(|v| v >= 4.0),
    },
    Bucket {
        keywords: &["fokus", "konzentration", "kreativ", "focus", "creative"],
        lead_in: "Für Fokus und Kreativität eignen sich diese Produkte:",
        filter: |p| tags_contain(p, &["fokus", "konzentration", "kreativ", "focus"]),
    },
    Bucket {
        keywords: &["indica"],
        lead_in: "Das sind unsere Indica-Sorten:",
        filter: |p| p.strain == StrainType::Indica,
    },
    Bucket {
        keywords: &["sativa"],
        lead_in: "Das sind unsere Sativa-Sorten:",
        filter: |p| p.strain == StrainType::Sativa,
    },
    Bucket {
        keywords: &["hybrid"],
        lead_in: "Das sind unsere Hybrid-Sorten:",
        filter: |p| p.strain == StrainType::Hybrid,
    },
    Bucket {
        keywords: &["produkt", "empfehl", "zeig", "product", "recommend", "show"],
        lead_in: "Hier sind ein paar unserer beliebtesten Produkte:",
        filter: |_| true,
    },
];

const RANDOM_LEAD_IN: &str = "Vielleicht ist ja hier etwas für dich dabei:";

/// Keyword-bucket classifier with a seedable random terminal branch.
pub struct FallbackResponder {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
}

impl FallbackResponder {
    /// Create a responder. `seed` pins the random terminal branch for
    /// reproducible sessions; `None` draws a fresh seed.
    pub fn new(catalog: Arc<Catalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Produce the canned reply for a query without tool intent.
    pub fn respond(&self, query: &str) -> FallbackReply {
        let text = query.to_lowercase();

        for bucket in BUCKETS {
            if bucket.keywords.iter().any(|kw| text.contains(kw)) {
                let products: Vec<ProductRecord> = self
                    .catalog
                    .filter(bucket.filter)
                    .into_iter()
                    .cloned()
                    .collect();

                return FallbackReply {
                    message: bucket.lead_in.to_string(),
                    products,
                };
            }
        }

        self.random_sample()
    }

    fn random_sample(&self) -> FallbackReply {
        let mut products: Vec<ProductRecord> = self.catalog.products().to_vec();
        products.shuffle(&mut *self.rng.lock());
        products.truncate(MAX_SEARCH_RESULTS);

        FallbackReply {
            message: RANDOM_LEAD_IN.to_string(),
            products,
        }
    }
}

fn tags_contain(product: &ProductRecord, needles: &[&str]) -> bool {
    product
        .effects
        .iter()
        .chain(product.benefits.iter())
        .any(|tag| {
            let tag = tag.to_lowercase();
            needles.iter().any(|needle| tag.contains(needle))
        })
}
