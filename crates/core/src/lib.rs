//! Core traits and types for the product advisor
//!
//! This crate provides foundational types used across all other crates:
//! - Product and catalog types (records, ids, strains, terpenes)
//! - Storefront routes
//! - Conversation types (turns, transcript)
//! - Host-capability traits (speech recognition, voice playback, UI bridge)
//! - Error types

pub mod conversation;
pub mod error;
pub mod product;
pub mod route;
pub mod traits;

pub use conversation::{Transcript, Turn, TurnRole};
pub use error::{Error, Result};
pub use product::{ProductId, ProductRecord, StrainType, Terpene};
pub use route::Route;
pub use traits::{RecognitionEvent, SpeechRecognizer, UiBridge, VoicePlayback};
