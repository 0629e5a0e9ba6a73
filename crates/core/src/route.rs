//! Storefront routes the advisor can navigate to

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// A storefront route.
///
/// The fixed route set of the shop plus a literal passthrough for targets
/// that already look like a path (e.g. "/products" sent by a remote agent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Landing page `/`
    Home,
    /// Product listing `/products`
    Products,
    /// Product detail `/products/{id}`
    Product(ProductId),
    /// Cart `/cart`
    Cart,
    /// Checkout `/checkout`
    Checkout,
    /// Literal passthrough route
    Other(String),
}

impl Route {
    /// Render the route as a path.
    pub fn as_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Products => "/products".to_string(),
            Route::Product(id) => format!("/products/{}", id),
            Route::Cart => "/cart".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::Other(path) => path.clone(),
        }
    }

    /// Normalize a free-form navigation target into a route.
    ///
    /// Substring heuristics, checked in order: home-like, product-like (but
    /// not the plural, which is already a path-shaped target), cart-like,
    /// checkout-like. Anything else passes through as a literal route.
    pub fn from_target(target: &str) -> Route {
        let t = target.to_lowercase();

        if t.contains("home") || t.contains("start") {
            Route::Home
        } else if (t.contains("produkt") || t.contains("product"))
            && !(t.contains("produkte") || t.contains("products"))
        {
            Route::Products
        } else if t.contains("warenkorb") || t.contains("korb") || t.contains("cart") {
            Route::Cart
        } else if t.contains("kasse") || t.contains("checkout") {
            Route::Checkout
        } else {
            Route::Other(target.to_string())
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path())
    }
}
