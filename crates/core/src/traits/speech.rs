//! Speech capability traits

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::Result;

/// Event emitted by a speech recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Partial transcript while the user is still speaking
    Interim(String),
    /// Final transcript for one utterance
    Final(String),
}

/// Speech-to-text capability of the host environment.
///
/// Recognizers run in continuous, interim-results mode for a fixed locale.
/// A `listen` stream ends when the underlying session ends; the advisor's
/// listening loop restarts it while the panel is open.
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Whether the host environment supports speech recognition at all.
    /// Checked once up front; unsupported recognizers disable the feature
    /// for the session.
    fn is_supported(&self) -> bool;

    /// Recognition locale (e.g. "de-DE")
    fn locale(&self) -> &str;

    /// Start one recognition session and stream its events.
    fn listen(&self) -> Pin<Box<dyn Stream<Item = RecognitionEvent> + Send + '_>>;

    /// Stop the active recognition session, if any.
    fn stop(&self);
}

/// Text-to-speech playback capability.
///
/// Session-based: `speak` resolves when playback finishes, `stop` cancels
/// an active session.
#[async_trait]
pub trait VoicePlayback: Send + Sync + 'static {
    /// Play the given text. Resolves once playback completes.
    async fn speak(&self, text: &str) -> Result<()>;

    /// Cancel any active playback session.
    async fn stop(&self) -> Result<()>;
}
