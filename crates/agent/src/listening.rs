//! Continuous speech listening loop
//!
//! Bridges a host speech recognizer into the advisor: interim transcripts
//! feed the live-transcript state, final transcripts go through the same
//! submission path as typed input. Recognition sessions are restarted on
//! every end while the panel is open.

use std::sync::Arc;

use futures::StreamExt;

use advisor_core::{RecognitionEvent, SpeechRecognizer};

use crate::advisor::ProductAdvisor;
use crate::AdvisorError;

const SPEECH_UNSUPPORTED: &str =
    "Spracheingabe wird in dieser Umgebung leider nicht unterstützt.";

/// Handle to a running listening loop.
pub struct ListeningSession {
    handle: tokio::task::JoinHandle<()>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl ListeningSession {
    /// Stop the recognizer and the loop.
    pub fn stop(self) {
        self.recognizer.stop();
        self.handle.abort();
    }
}

/// Start the continuous listening loop.
///
/// Unsupported recognizers are rejected up front with one user-visible
/// notification; the feature stays disabled for the session.
pub fn start_listening(
    advisor: Arc<ProductAdvisor>,
    recognizer: Arc<dyn SpeechRecognizer>,
) -> Result<ListeningSession, AdvisorError> {
    if !recognizer.is_supported() {
        let advisor = Arc::clone(&advisor);
        tokio::spawn(async move {
            advisor.notify_user(SPEECH_UNSUPPORTED).await;
        });
        return Err(AdvisorError::SpeechUnsupported);
    }

    tracing::debug!(locale = recognizer.locale(), "starting listening loop");

    let handle = tokio::spawn({
        let recognizer = Arc::clone(&recognizer);
        async move {
            let mut closed = advisor.closed_watch();

            while !advisor.is_closed() {
                let mut events = recognizer.listen();

                loop {
                    tokio::select! {
                        event = events.next() => match event {
                            Some(RecognitionEvent::Interim(text)) => {
                                advisor.set_live_transcript(&text);
                            }
                            Some(RecognitionEvent::Final(text)) => {
                                advisor.set_live_transcript("");
                                if let Err(e) = advisor.process(&text).await {
                                    tracing::warn!("voice submission failed: {}", e);
                                }
                            }
                            // Session ended; restart while the panel is open.
                            None => break,
                        },
                        _ = async { let _ = closed.wait_for(|closed| *closed).await; } => {
                            recognizer.stop();
                            return;
                        }
                    }
                }
            }

            recognizer.stop();
        }
    });

    Ok(ListeningSession { handle, recognizer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_catalog::sample_catalog;
    use advisor_config::{AdvisorConfig, RemoteAgentConfig};
    use advisor_core::{Route, UiBridge};
    use async_trait::async_trait;
    use futures::Stream;
    use parking_lot::Mutex;
    use std::pin::Pin;
    use std::time::Duration;

    #[derive(Default)]
    struct NullBridge {
        toasts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UiBridge for NullBridge {
        async fn navigate(&self, _route: &Route) -> advisor_core::Result<()> {
            Ok(())
        }

        async fn notify(&self, message: &str) -> advisor_core::Result<()> {
            self.toasts.lock().push(message.to_string());
            Ok(())
        }
    }

    /// Yields one scripted session, then idles forever on restart.
    struct ScriptedRecognizer {
        sessions: Mutex<usize>,
        supported: bool,
    }

    impl ScriptedRecognizer {
        fn new(supported: bool) -> Self {
            Self {
                sessions: Mutex::new(0),
                supported,
            }
        }
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn locale(&self) -> &str {
            "de-DE"
        }

        fn listen(&self) -> Pin<Box<dyn Stream<Item = RecognitionEvent> + Send + '_>> {
            let mut sessions = self.sessions.lock();
            *sessions += 1;

            if *sessions == 1 {
                Box::pin(futures::stream::iter(vec![
                    RecognitionEvent::Interim("geh zu".to_string()),
                    RecognitionEvent::Final("geh zu warenkorb".to_string()),
                ]))
            } else {
                Box::pin(futures::stream::pending())
            }
        }

        fn stop(&self) {}
    }

    fn advisor() -> (Arc<ProductAdvisor>, Arc<NullBridge>) {
        let bridge = Arc::new(NullBridge::default());
        let advisor = Arc::new(ProductAdvisor::new(
            AdvisorConfig {
                navigation_delay_ms: 10_000,
                ..AdvisorConfig::default()
            },
            RemoteAgentConfig::default(),
            Arc::new(sample_catalog()),
            bridge.clone(),
        ));
        advisor.open();
        (advisor, bridge)
    }

    #[tokio::test]
    async fn test_unsupported_recognizer_is_rejected_once() {
        let (advisor, bridge) = advisor();
        let recognizer = Arc::new(ScriptedRecognizer::new(false));

        let result = start_listening(advisor, recognizer);
        assert!(matches!(result, Err(AdvisorError::SpeechUnsupported)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let toasts = bridge.toasts.lock();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].contains("nicht unterstützt"));
    }

    #[tokio::test]
    async fn test_final_transcripts_feed_the_conversation() {
        let (advisor, _) = advisor();
        let recognizer = Arc::new(ScriptedRecognizer::new(true));

        let session = start_listening(advisor.clone(), recognizer.clone()).unwrap();

        // The final transcript flows through the normal submission path.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while advisor.turn_count() < 3 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let transcript = advisor.transcript();
        assert_eq!(transcript.user_turns(), 1);
        assert_eq!(transcript.turns()[1].content, "geh zu warenkorb");

        // The recognizer was restarted after its first session ended.
        assert!(*recognizer.sessions.lock() >= 2);

        session.stop();
    }
}
