//! Host-capability traits
//!
//! The advisor core stays free of any concrete UI, speech, or playback
//! backend; hosts plug their environment in through these traits.

pub mod speech;
pub mod ui;

pub use speech::{RecognitionEvent, SpeechRecognizer, VoicePlayback};
pub use ui::UiBridge;
