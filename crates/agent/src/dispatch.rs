//! Tool dispatch
//!
//! Executes one tool intent against the catalog and the UI bridge. Lookup
//! misses come back as user-facing strings, never as errors.

use std::sync::Arc;

use advisor_catalog::Catalog;
use advisor_core::{ProductId, ProductRecord, Route, UiBridge};

use crate::intent::ToolIntent;

/// Fixed reply for any product lookup miss.
pub const PRODUCT_NOT_FOUND: &str = "Ich konnte dieses Produkt leider nicht finden.";

/// Result of dispatching one tool intent.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Human-readable confirmation for the transcript
    pub reply: String,
    /// New recommended-products state, when the tool produced one
    pub recommendations: Option<Vec<ProductRecord>>,
    /// Navigation to perform after the configured delay (the advisor closes
    /// the panel first); `None` when the tool does not navigate
    pub deferred_navigation: Option<Route>,
}

impl DispatchOutcome {
    fn reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }
}

/// Executes tool intents.
pub struct ToolDispatcher {
    catalog: Arc<Catalog>,
    ui: Arc<dyn UiBridge>,
}

impl ToolDispatcher {
    pub fn new(catalog: Arc<Catalog>, ui: Arc<dyn UiBridge>) -> Self {
        Self { catalog, ui }
    }

    /// Execute one intent and describe what happened.
    pub async fn dispatch(&self, intent: ToolIntent) -> DispatchOutcome {
        match intent {
            ToolIntent::NavigateToPage { target } => self.navigate_to_page(target),
            ToolIntent::SearchProducts { query } => self.search_products(&query),
            ToolIntent::ShowProductDetails { id } => self.show_product_details(id),
            ToolIntent::AddToCart { id, quantity } => self.add_to_cart(id, quantity).await,
        }
    }

    fn navigate_to_page(&self, target: Route) -> DispatchOutcome {
        DispatchOutcome {
            reply: format!("Ich navigiere zu {}", target.as_path()),
            recommendations: None,
            deferred_navigation: Some(target),
        }
    }

    fn search_products(&self, query: &str) -> DispatchOutcome {
        let results: Vec<ProductRecord> =
            self.catalog.search(query).into_iter().cloned().collect();

        let reply = match results.len() {
            0 => format!("Zu \"{}\" habe ich leider nichts gefunden.", query),
            1 => format!("Ich habe 1 Produkt zu \"{}\" gefunden.", query),
            n => format!("Ich habe {} Produkte zu \"{}\" gefunden.", n, query),
        };

        DispatchOutcome {
            reply,
            recommendations: Some(results),
            deferred_navigation: None,
        }
    }

    fn show_product_details(&self, id: ProductId) -> DispatchOutcome {
        match self.catalog.get(id) {
            Some(product) => DispatchOutcome {
                reply: format!("Hier sind die Details zu {}.", product.name),
                recommendations: None,
                deferred_navigation: Some(Route::Product(id)),
            },
            None => DispatchOutcome::reply(PRODUCT_NOT_FOUND),
        }
    }

    async fn add_to_cart(&self, id: ProductId, quantity: u32) -> DispatchOutcome {
        match self.catalog.get(id) {
            Some(product) => {
                // Notification only; the actual cart lives in the storefront.
                let message = format!(
                    "{}x {} wurde zum Warenkorb hinzugefügt.",
                    quantity, product.name
                );
                if let Err(e) = self.ui.notify(&message).await {
                    tracing::warn!("cart notification failed: {}", e);
                }
                DispatchOutcome::reply(message)
            }
            None => DispatchOutcome::reply(PRODUCT_NOT_FOUND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_catalog::{sample_catalog, MAX_SEARCH_RESULTS};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBridge {
        routes: Mutex<Vec<String>>,
        toasts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UiBridge for RecordingBridge {
        async fn navigate(&self, route: &Route) -> advisor_core::Result<()> {
            self.routes.lock().push(route.as_path());
            Ok(())
        }

        async fn notify(&self, message: &str) -> advisor_core::Result<()> {
            self.toasts.lock().push(message.to_string());
            Ok(())
        }
    }

    fn dispatcher() -> (ToolDispatcher, Arc<RecordingBridge>) {
        let bridge = Arc::new(RecordingBridge::default());
        let dispatcher = ToolDispatcher::new(Arc::new(sample_catalog()), bridge.clone());
        (dispatcher, bridge)
    }

    #[tokio::test]
    async fn test_navigation_confirmation() {
        let (dispatcher, bridge) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::NavigateToPage { target: Route::Cart })
            .await;

        assert_eq!(outcome.reply, "Ich navigiere zu /cart");
        assert_eq!(outcome.deferred_navigation, Some(Route::Cart));
        // Navigation is deferred; the dispatcher itself must not navigate.
        assert!(bridge.routes.lock().is_empty());
    }

    #[tokio::test]
    async fn test_search_caps_results() {
        let (dispatcher, _) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::SearchProducts {
                query: "schmerzen".to_string(),
            })
            .await;

        let results = outcome.recommendations.unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= MAX_SEARCH_RESULTS);
        assert!(outcome.reply.contains(&results.len().to_string()));
    }

    #[tokio::test]
    async fn test_search_without_hits() {
        let (dispatcher, _) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::SearchProducts {
                query: "koffein".to_string(),
            })
            .await;

        assert_eq!(outcome.recommendations.unwrap().len(), 0);
        assert!(outcome.reply.contains("nichts gefunden"));
    }

    #[tokio::test]
    async fn test_details_hit_and_miss() {
        let (dispatcher, bridge) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::ShowProductDetails { id: ProductId(1) })
            .await;
        assert!(outcome.reply.contains("Northern Lights"));
        assert_eq!(
            outcome.deferred_navigation,
            Some(Route::Product(ProductId(1)))
        );

        let outcome = dispatcher
            .dispatch(ToolIntent::ShowProductDetails { id: ProductId(999) })
            .await;
        assert_eq!(outcome.reply, PRODUCT_NOT_FOUND);
        assert_eq!(outcome.deferred_navigation, None);
        assert!(bridge.routes.lock().is_empty());
        assert!(bridge.toasts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_notifies() {
        let (dispatcher, bridge) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::AddToCart {
                id: ProductId(2),
                quantity: 2,
            })
            .await;

        assert!(outcome.reply.contains("2x Sour Diesel"));
        let toasts = bridge.toasts.lock();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].contains("Warenkorb"));
    }

    #[tokio::test]
    async fn test_add_to_cart_miss_has_no_side_effect() {
        let (dispatcher, bridge) = dispatcher();

        let outcome = dispatcher
            .dispatch(ToolIntent::AddToCart {
                id: ProductId(999),
                quantity: 1,
            })
            .await;

        assert_eq!(outcome.reply, PRODUCT_NOT_FOUND);
        assert!(bridge.toasts.lock().is_empty());
    }
}
