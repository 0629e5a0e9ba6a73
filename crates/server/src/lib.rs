//! HTTP server for the product advisor
//!
//! One advisor per session, managed with inactivity expiry; REST endpoints
//! for sessions, chat, and the catalog.

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::{Session, SessionManager, StorefrontBridge};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("session error: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(#[from] advisor_config::ConfigError),
}
