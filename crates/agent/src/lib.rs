//! Conversational Product Advisor
//!
//! Features:
//! - Keyword intent detection over free-text input (German-first)
//! - Typed tool dispatch (navigate, search, details, cart)
//! - Keyword-bucket fallback responses
//! - Optional remote-agent delegation over HTTP
//! - Turn-taking state machine with voice support

pub mod advisor;
pub mod bridge;
pub mod dispatch;
pub mod fallback;
pub mod intent;
pub mod listening;

pub use advisor::{AdvisorEvent, PanelState, ProductAdvisor};
pub use bridge::{BridgeError, RemoteAgentBridge, RemoteAgentResponse};
pub use dispatch::{DispatchOutcome, ToolDispatcher, PRODUCT_NOT_FOUND};
pub use fallback::{FallbackReply, FallbackResponder};
pub use intent::{IntentDetector, ToolIntent};
pub use listening::{start_listening, ListeningSession};

use thiserror::Error;

/// Advisor errors
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("remote agent error: {0}")]
    Bridge(#[from] bridge::BridgeError),

    #[error("speech recognition is not supported in this environment")]
    SpeechUnsupported,

    #[error(transparent)]
    Core(#[from] advisor_core::Error),
}
