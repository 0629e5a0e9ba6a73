//! Error types

use thiserror::Error;

/// Result alias used by the host-capability traits.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by host capabilities and core type conversions.
#[derive(Error, Debug)]
pub enum Error {
    /// Speech recognition failed or is unavailable
    #[error("speech recognition error: {0}")]
    Speech(String),

    /// Voice playback failed
    #[error("voice playback error: {0}")]
    Voice(String),

    /// UI bridge operation failed (navigation, notification)
    #[error("ui error: {0}")]
    Ui(String),

    /// A product id could not be parsed
    #[error("invalid product id: {0:?}")]
    InvalidProductId(String),
}
