//! UI bridge trait

use async_trait::async_trait;

use crate::{Result, Route};

/// Side-effect surface of the hosting storefront.
///
/// The advisor never touches the UI directly; navigation and toast
/// notifications go through this bridge so hosts (and tests) control what
/// actually happens.
#[async_trait]
pub trait UiBridge: Send + Sync + 'static {
    /// Navigate the storefront to the given route.
    async fn navigate(&self, route: &Route) -> Result<()>;

    /// Show a non-blocking notification (toast).
    async fn notify(&self, message: &str) -> Result<()>;
}
