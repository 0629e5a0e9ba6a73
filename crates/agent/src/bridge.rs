//! Remote agent bridge
//!
//! Optional HTTP delegation of user turns to an external workflow webhook.
//! Disabled by default; when disabled, turn processing never leaves the
//! advisor. Transport failures and non-2xx responses surface as typed
//! errors so the caller can fall back to local processing.

use std::time::Duration;

use advisor_catalog::{Catalog, KnowledgeIndex, ProductKnowledge};
use advisor_config::RemoteAgentConfig;
use advisor_core::{ProductId, ProductRecord, Route, StrainType, Turn};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("remote agent is disabled")]
    Disabled,

    #[error("no webhook url configured")]
    MissingUrl,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote agent returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Outbound webhook payload
#[derive(Debug, Serialize)]
struct RemoteAgentRequest<'a> {
    message: &'a str,
    conversation_history: Vec<HistoryEntry>,
    user_info: UserInfo,
    available_products: &'a [ProductKnowledge],
}

#[derive(Debug, Serialize)]
struct HistoryEntry {
    role: &'static str,
    content: String,
}

impl From<&Turn> for HistoryEntry {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserInfo {
    page: String,
    timestamp: String,
}

/// Webhook response
#[derive(Debug, Deserialize)]
pub struct RemoteAgentResponse {
    /// Assistant reply text
    pub message: String,
    /// Products to recommend, reconciled against the catalog by the caller
    #[serde(default)]
    pub products: Vec<RemoteProduct>,
    /// Requested side effects
    #[serde(default)]
    pub actions: Option<RemoteActions>,
}

/// Product reference in a webhook response. Ids arrive as numbers or
/// strings; both are normalized to [`ProductId`] here, unusable ids
/// become `None` and fall through to name matching.
#[derive(Debug, Deserialize)]
pub struct RemoteProduct {
    #[serde(default, deserialize_with = "lenient_product_id")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Side effects a remote agent may request.
#[derive(Debug, Default, Deserialize)]
pub struct RemoteActions {
    /// Free-form navigation target
    #[serde(default)]
    pub navigate_to: Option<String>,
    /// Cart-add notification
    #[serde(default)]
    pub add_to_cart: Option<RemoteCartAdd>,
    /// Opaque action, logged only
    #[serde(default)]
    pub custom_action: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteCartAdd {
    #[serde(default, deserialize_with = "lenient_product_id")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

fn lenient_product_id<'de, D>(deserializer: D) -> Result<Option<ProductId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    let id = match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(ProductId),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().ok().map(ProductId),
        _ => None,
    };

    Ok(id)
}

/// HTTP client for the external workflow webhook.
pub struct RemoteAgentBridge {
    client: Client,
    config: RemoteAgentConfig,
    knowledge: KnowledgeIndex,
}

impl RemoteAgentBridge {
    pub fn new(
        config: RemoteAgentConfig,
        knowledge: KnowledgeIndex,
    ) -> Result<Self, BridgeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            knowledge,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.webhook_url.is_some()
    }

    /// Send one user turn to the webhook.
    ///
    /// `history` is the transcript up to (not including) the current
    /// message; `page` is the storefront route the user is on.
    pub async fn consult(
        &self,
        message: &str,
        history: &[Turn],
        page: &Route,
    ) -> Result<RemoteAgentResponse, BridgeError> {
        if !self.config.enabled {
            return Err(BridgeError::Disabled);
        }
        let url = self
            .config
            .webhook_url
            .as_deref()
            .ok_or(BridgeError::MissingUrl)?;

        let request = RemoteAgentRequest {
            message,
            conversation_history: history.iter().map(HistoryEntry::from).collect(),
            user_info: UserInfo {
                page: page.as_path(),
                timestamp: Utc::now().to_rfc3339(),
            },
            available_products: self
                .knowledge
                .within_budget(self.config.context_budget_chars),
        };

        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<RemoteAgentResponse>()
            .await
            .map_err(|e| BridgeError::InvalidResponse(e.to_string()))
    }
}

/// Reconcile remote product references against the local catalog: by id,
/// then by case-insensitive name, else a stub record with placeholder
/// category and image.
pub fn reconcile_products(catalog: &Catalog, remote: &[RemoteProduct]) -> Vec<ProductRecord> {
    remote
        .iter()
        .map(|reference| {
            if let Some(product) = reference.id.and_then(|id| catalog.get(id)) {
                return product.clone();
            }
            if let Some(product) = reference.name.as_deref().and_then(|name| catalog.by_name(name)) {
                return product.clone();
            }
            stub_record(reference)
        })
        .collect()
}

fn stub_record(reference: &RemoteProduct) -> ProductRecord {
    ProductRecord {
        id: reference.id.unwrap_or(ProductId::UNKNOWN),
        name: reference
            .name
            .clone()
            .unwrap_or_else(|| "Unbekanntes Produkt".to_string()),
        category: reference
            .category
            .clone()
            .unwrap_or_else(|| "Sonstiges".to_string()),
        strain: StrainType::Hybrid,
        price: 0.0,
        thc: String::new(),
        cbd: String::new(),
        effects: Vec::new(),
        benefits: Vec::new(),
        terpenes: Vec::new(),
        flavors: Vec::new(),
        images: vec!["/images/products/placeholder.jpg".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_catalog::sample_catalog;

    fn bridge(url: Option<String>, enabled: bool) -> RemoteAgentBridge {
        let catalog = sample_catalog();
        RemoteAgentBridge::new(
            RemoteAgentConfig {
                enabled,
                webhook_url: url,
                timeout_secs: 2,
                context_budget_chars: 1000,
            },
            KnowledgeIndex::from_catalog(&catalog),
        )
        .unwrap()
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "message": "Dafür empfehle ich dir Harlequin.",
            "products": [
                { "id": 8 },
                { "id": "3", "name": "ACDC" },
                { "name": "Rosenöl", "category": "Extrakte" }
            ],
            "actions": {
                "navigate_to": "/products",
                "add_to_cart": { "product_id": "2", "quantity": 2 },
                "custom_action": { "kind": "highlight" }
            }
        }"#;

        let response: RemoteAgentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.products.len(), 3);
        assert_eq!(response.products[0].id, Some(ProductId(8)));
        assert_eq!(response.products[1].id, Some(ProductId(3)));
        assert_eq!(response.products[2].id, None);

        let actions = response.actions.unwrap();
        assert_eq!(actions.navigate_to.as_deref(), Some("/products"));
        assert_eq!(actions.add_to_cart.unwrap().product_id, Some(ProductId(2)));
        assert!(actions.custom_action.is_some());
    }

    #[test]
    fn test_non_numeric_id_falls_to_name_matching() {
        let json = r#"{ "message": "ok", "products": [ { "id": "sku-acdc", "name": "ACDC" } ] }"#;
        let response: RemoteAgentResponse = serde_json::from_str(json).unwrap();

        let catalog = sample_catalog();
        let products = reconcile_products(&catalog, &response.products);
        assert_eq!(products[0].id, ProductId(3));
    }

    #[test]
    fn test_reconciliation_stubs_unknown_products() {
        let catalog = sample_catalog();
        let remote = vec![RemoteProduct {
            id: None,
            name: Some("Rosenöl".to_string()),
            category: None,
        }];

        let products = reconcile_products(&catalog, &remote);
        assert_eq!(products[0].id, ProductId::UNKNOWN);
        assert_eq!(products[0].name, "Rosenöl");
        assert_eq!(products[0].category, "Sonstiges");
        assert!(products[0].images[0].contains("placeholder"));
    }

    #[tokio::test]
    async fn test_disabled_bridge_refuses() {
        let bridge = bridge(Some("http://127.0.0.1:1/webhook".to_string()), false);
        let err = bridge
            .consult("hallo", &[], &Route::Home)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Disabled));
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_a_transport_error() {
        let bridge = bridge(Some("http://127.0.0.1:1/webhook".to_string()), true);
        let err = bridge
            .consult("hallo", &[], &Route::Home)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_an_api_error() {
        let url = spawn_failing_server().await;
        let bridge = bridge(Some(url), true);

        let history = vec![Turn::assistant("Hallo!"), Turn::user("hi")];
        let err = bridge
            .consult("hallo", &history, &Route::Products)
            .await
            .unwrap_err();

        match err {
            BridgeError::Api { status, .. } => assert_eq!(status, 500),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    /// Minimal HTTP server answering every request with 500.
    async fn spawn_failing_server() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    // Drain the request headers plus whatever body made it
                    // into the first segments before answering.
                    let mut buf = vec![0u8; 16 * 1024];
                    let mut total = 0;
                    loop {
                        match socket.read(&mut buf[total..]).await {
                            Ok(0) => break,
                            Ok(n) => {
                                total += n;
                                if request_complete(&buf[..total]) || total == buf.len() {
                                    break;
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 500 Internal Server Error\r\n\
                              content-length: 5\r\n\
                              connection: close\r\n\r\nboom!",
                        )
                        .await;
                });
            }
        });

        format!("http://{}/webhook", addr)
    }

    fn request_complete(data: &[u8]) -> bool {
        let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&data[..header_end]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        data.len() >= header_end + 4 + content_length
    }
}
