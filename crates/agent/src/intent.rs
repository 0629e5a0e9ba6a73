//! Intent detection
//!
//! Maps raw user text to at most one tool intent via ordered keyword rule
//! groups. Matching is case-insensitive substring containment; a group only
//! produces an intent when its trigger matches AND its parameter extraction
//! succeeds, otherwise evaluation falls through to the next group.

use advisor_core::{ProductId, Route};
use regex::Regex;

/// A recognized user request for a specific action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolIntent {
    /// Navigate the storefront
    NavigateToPage { target: Route },
    /// Search the catalog
    SearchProducts { query: String },
    /// Open a product detail page
    ShowProductDetails { id: ProductId },
    /// Announce a cart addition
    AddToCart { id: ProductId, quantity: u32 },
}

const NAVIGATION_TRIGGERS: &[&str] = &[
    "geh zu",
    "gehe zu",
    "zeig mir die",
    "zeige mir die",
    "navigiere zu",
    "öffne",
    "zur seite",
    "go to",
    "navigate to",
    "open",
    "show me the",
];

const HOME_KEYWORDS: &[&str] = &["startseite", "hauptseite", "home"];
const LISTING_KEYWORDS: &[&str] = &["produkte", "products", "sortiment", "shop"];
const CART_KEYWORDS: &[&str] = &["warenkorb", "cart"];
const CHECKOUT_KEYWORDS: &[&str] = &["kasse", "checkout"];

const SEARCH_TRIGGERS: &[&str] = &[
    "such",
    "finde",
    "zeig mir produkte für",
    "zeige mir produkte für",
    "search",
    "find",
    "show me products for",
];

/// Connector words separating the search phrase from its query; the text
/// after the first connector found is the query.
const SEARCH_CONNECTORS: &[&str] = &[" für ", " zu ", " nach ", " for "];

/// Fallback query vocabulary scanned when no connector is present.
const SYMPTOM_KEYWORDS: &[&str] = &[
    "schmerz",
    "pain",
    "schlaf",
    "sleep",
    "angst",
    "anxiety",
    "appetit",
    "appetite",
    "fokus",
    "focus",
    "energie",
    "energy",
    "entspannung",
    "relaxation",
    "indica",
    "sativa",
    "hybrid",
];

const CART_ADD_TRIGGERS: &[&str] = &[
    "zum warenkorb",
    "in den warenkorb",
    "kauf",
    "bestell",
    "add to cart",
    "into the cart",
    "buy",
    "order",
];

const DETAIL_TRIGGERS: &[&str] = &[
    "details zu produkt",
    "mehr über produkt",
    "mehr zu produkt",
    "informationen zu produkt",
    "details about product",
    "more about product",
    "information about product",
];

/// Intent detector with the compiled extraction patterns.
pub struct IntentDetector {
    product_id: Regex,
    quantity: Regex,
}

impl IntentDetector {
    pub fn new() -> Self {
        Self {
            product_id: Regex::new(r"(?:produkt|product)\s*(\d+)").unwrap(),
            quantity: Regex::new(r"(\d+)\s*(?:stück|stk|pieces|piece)").unwrap(),
        }
    }

    /// Detect at most one tool intent in the input.
    ///
    /// Detection is pure: identical input always yields the same result.
    pub fn detect(&self, input: &str) -> Option<ToolIntent> {
        let text = input.to_lowercase();

        self.detect_navigation(&text)
            .or_else(|| self.detect_search(&text))
            .or_else(|| self.detect_cart_add(&text))
            .or_else(|| self.detect_details(&text))
    }

    fn detect_navigation(&self, text: &str) -> Option<ToolIntent> {
        if !contains_any(text, NAVIGATION_TRIGGERS) {
            return None;
        }

        // Sub-rules in fixed order, first match wins.
        let target = if contains_any(text, HOME_KEYWORDS) {
            Route::Home
        } else if let Some(id) = self.extract_product_id(text) {
            Route::Product(id)
        } else if contains_any(text, LISTING_KEYWORDS) {
            Route::Products
        } else if contains_any(text, CART_KEYWORDS) {
            Route::Cart
        } else if contains_any(text, CHECKOUT_KEYWORDS) {
            Route::Checkout
        } else {
            return None;
        };

        Some(ToolIntent::NavigateToPage { target })
    }

    fn detect_search(&self, text: &str) -> Option<ToolIntent> {
        if !contains_any(text, SEARCH_TRIGGERS) {
            return None;
        }

        // The query is everything after the first connector word.
        let connector = SEARCH_CONNECTORS
            .iter()
            .filter_map(|c| text.find(c).map(|pos| (pos, *c)))
            .min_by_key(|(pos, _)| *pos);

        let query = match connector {
            Some((pos, connector)) => {
                let tail = &text[pos + connector.len()..];
                tail.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?'))
                    .to_string()
            }
            None => String::new(),
        };

        let query = if query.is_empty() {
            SYMPTOM_KEYWORDS
                .iter()
                .find(|kw| text.contains(*kw))
                .map(|kw| kw.to_string())?
        } else {
            query
        };

        Some(ToolIntent::SearchProducts { query })
    }

    fn detect_cart_add(&self, text: &str) -> Option<ToolIntent> {
        if !contains_any(text, CART_ADD_TRIGGERS) {
            return None;
        }

        let id = self.extract_product_id(text)?;
        let quantity = self
            .quantity
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);

        Some(ToolIntent::AddToCart { id, quantity })
    }

    fn detect_details(&self, text: &str) -> Option<ToolIntent> {
        if !contains_any(text, DETAIL_TRIGGERS) {
            return None;
        }

        let id = self.extract_product_id(text)?;
        Some(ToolIntent::ShowProductDetails { id })
    }

    fn extract_product_id(&self, text: &str) -> Option<ProductId> {
        self.product_id
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
