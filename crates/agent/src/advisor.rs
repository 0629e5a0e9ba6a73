//! The product advisor
//!
//! Orchestrates turn-taking across the intent detector, tool dispatcher,
//! fallback responder, and the optional remote bridge. One advisor owns one
//! conversation; state lives here and nowhere else.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};

use advisor_catalog::{Catalog, KnowledgeIndex, MAX_SEARCH_RESULTS};
use advisor_config::{AdvisorConfig, RemoteAgentConfig};
use advisor_core::{ProductRecord, Route, Transcript, Turn, UiBridge, VoicePlayback};

use crate::bridge::{self, RemoteAgentBridge};
use crate::dispatch::{DispatchOutcome, ToolDispatcher};
use crate::fallback::FallbackResponder;
use crate::intent::{IntentDetector, ToolIntent};
use crate::AdvisorError;

/// Panel and turn-taking state.
///
/// `Closed → Idle` when the user opens the panel, `Idle ⇄ AwaitingResponse`
/// while turns are processed, back to `Closed` when the user closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Idle,
    AwaitingResponse,
}

/// Advisor events for hosting UIs
#[derive(Debug, Clone)]
pub enum AdvisorEvent {
    /// Panel opened
    Opened,
    /// Panel closed
    Closed,
    /// Turn processing started
    Thinking,
    /// Assistant reply ready
    Reply(String),
    /// Recommended-products display state changed
    Recommendations(Vec<ProductRecord>),
    /// A deferred navigation was performed
    Navigated(Route),
    /// Turn processing failed (an apology turn was produced)
    Error(String),
}

const APOLOGY: &str =
    "Entschuldigung, da ist etwas schiefgelaufen. Versuch es bitte gleich noch einmal.";
const REMOTE_UNAVAILABLE: &str =
    "Der externe Berater ist gerade nicht erreichbar, ich übernehme.";
const VOICE_FAILED: &str = "Die Sprachausgabe ist gerade nicht verfügbar.";

/// State shared with background tasks (deferred navigation, listening).
struct Shared {
    ui: Arc<dyn UiBridge>,
    playback: Option<Arc<dyn VoicePlayback>>,
    state: Mutex<PanelState>,
    transcript: RwLock<Transcript>,
    recommendations: RwLock<Vec<ProductRecord>>,
    current_page: RwLock<Route>,
    voice_enabled: RwLock<bool>,
    live_transcript: watch::Sender<String>,
    closed: watch::Sender<bool>,
    events: broadcast::Sender<AdvisorEvent>,
}

impl Shared {
    /// Close the panel: cancel pending navigations via the watch channel
    /// and stop any active voice playback.
    async fn close(&self) {
        {
            let mut state = self.state.lock();
            if *state == PanelState::Closed {
                return;
            }
            *state = PanelState::Closed;
        }

        self.closed.send_replace(true);

        if let Some(playback) = &self.playback {
            if let Err(e) = playback.stop().await {
                tracing::warn!("stopping playback failed: {}", e);
            }
        }

        let _ = self.events.send(AdvisorEvent::Closed);
    }
}

/// Rule-based conversational product advisor.
pub struct ProductAdvisor {
    config: AdvisorConfig,
    catalog: Arc<Catalog>,
    detector: IntentDetector,
    dispatcher: ToolDispatcher,
    fallback: FallbackResponder,
    bridge: Option<RemoteAgentBridge>,
    shared: Arc<Shared>,
}

impl ProductAdvisor {
    /// Create an advisor without voice playback.
    pub fn new(
        config: AdvisorConfig,
        remote: RemoteAgentConfig,
        catalog: Arc<Catalog>,
        ui: Arc<dyn UiBridge>,
    ) -> Self {
        Self::build(config, remote, catalog, ui, None)
    }

    /// Create an advisor with a voice playback backend.
    pub fn with_playback(
        config: AdvisorConfig,
        remote: RemoteAgentConfig,
        catalog: Arc<Catalog>,
        ui: Arc<dyn UiBridge>,
        playback: Arc<dyn VoicePlayback>,
    ) -> Self {
        Self::build(config, remote, catalog, ui, Some(playback))
    }

    fn build(
        config: AdvisorConfig,
        remote: RemoteAgentConfig,
        catalog: Arc<Catalog>,
        ui: Arc<dyn UiBridge>,
        playback: Option<Arc<dyn VoicePlayback>>,
    ) -> Self {
        let (events, _) = broadcast::channel(100);
        let (live_transcript, _) = watch::channel(String::new());
        let (closed, _) = watch::channel(true);

        let mut transcript = Transcript::new();
        transcript.push(Turn::assistant(config.greeting.clone()));

        let bridge = if remote.enabled {
            match RemoteAgentBridge::new(remote, KnowledgeIndex::from_catalog(&catalog)) {
                Ok(bridge) => Some(bridge),
                Err(e) => {
                    tracing::warn!("remote agent bridge unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let shared = Arc::new(Shared {
            ui: ui.clone(),
            playback,
            state: Mutex::new(PanelState::Closed),
            transcript: RwLock::new(transcript),
            recommendations: RwLock::new(Vec::new()),
            current_page: RwLock::new(Route::Home),
            voice_enabled: RwLock::new(config.voice.enabled),
            live_transcript,
            closed,
            events,
        });

        Self {
            detector: IntentDetector::new(),
            dispatcher: ToolDispatcher::new(catalog.clone(), ui),
            fallback: FallbackResponder::new(catalog.clone(), config.fallback_seed),
            bridge,
            config,
            catalog,
            shared,
        }
    }

    /// Open the advisor panel.
    pub fn open(&self) {
        let mut state = self.shared.state.lock();
        if *state == PanelState::Closed {
            *state = PanelState::Idle;
            drop(state);
            self.shared.closed.send_replace(false);
            let _ = self.shared.events.send(AdvisorEvent::Opened);
        }
    }

    /// Close the advisor panel, cancelling playback and pending navigations.
    pub async fn close(&self) {
        self.shared.close().await;
    }

    /// Process one user submission.
    ///
    /// Returns `Ok(None)` when the submission was ignored: the panel is
    /// closed, or another turn is still in flight (submissions are ignored,
    /// not queued). Unexpected processing errors surface as one apology
    /// turn; they never escape the session.
    pub async fn process(&self, input: &str) -> Result<Option<String>, AdvisorError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        {
            let mut state = self.shared.state.lock();
            match *state {
                PanelState::Idle => *state = PanelState::AwaitingResponse,
                PanelState::Closed | PanelState::AwaitingResponse => {
                    tracing::debug!("submission ignored in state {:?}", *state);
                    return Ok(None);
                }
            }
        }

        self.push_turn(Turn::user(input));
        let _ = self.shared.events.send(AdvisorEvent::Thinking);

        let reply = match self.run_turn(input).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("turn processing failed: {}", e);
                let _ = self.shared.events.send(AdvisorEvent::Error(e.to_string()));
                APOLOGY.to_string()
            }
        };

        // A close while the turn was in flight discards the result.
        {
            let mut state = self.shared.state.lock();
            if *state == PanelState::Closed {
                tracing::debug!("panel closed mid-turn, discarding reply");
                return Ok(None);
            }
            *state = PanelState::Idle;
        }

        self.push_turn(Turn::assistant(reply.clone()));
        let _ = self.shared.events.send(AdvisorEvent::Reply(reply.clone()));

        self.speak(&reply).await;

        Ok(Some(reply))
    }

    async fn run_turn(&self, input: &str) -> Result<String, AdvisorError> {
        // Remote delegation first; local processing is the fallback path.
        if let Some(bridge) = &self.bridge {
            let history: Vec<Turn> = {
                let transcript = self.shared.transcript.read();
                let turns = transcript.turns();
                // Everything before the just-pushed user turn.
                turns[..turns.len().saturating_sub(1)].to_vec()
            };
            let page = self.shared.current_page.read().clone();

            match bridge.consult(input, &history, &page).await {
                Ok(response) => return self.apply_remote(response).await,
                Err(e) => {
                    tracing::warn!("remote agent failed, using local processing: {}", e);
                    self.notify_user(REMOTE_UNAVAILABLE).await;
                }
            }
        }

        if let Some(intent) = self.detector.detect(input) {
            let outcome = self.dispatcher.dispatch(intent).await;
            return Ok(self.apply_outcome(outcome));
        }

        let reply = self.fallback.respond(input);
        self.set_recommendations(reply.products);
        Ok(reply.message)
    }

    fn apply_outcome(&self, outcome: DispatchOutcome) -> String {
        if let Some(products) = outcome.recommendations {
            self.set_recommendations(products);
        }
        if let Some(route) = outcome.deferred_navigation {
            self.schedule_navigation(route);
        }
        outcome.reply
    }

    async fn apply_remote(
        &self,
        response: bridge::RemoteAgentResponse,
    ) -> Result<String, AdvisorError> {
        if !response.products.is_empty() {
            let products = bridge::reconcile_products(&self.catalog, &response.products);
            self.set_recommendations(products);
        }

        if let Some(actions) = &response.actions {
            if let Some(target) = &actions.navigate_to {
                self.schedule_navigation(Route::from_target(target));
            }

            if let Some(cart) = &actions.add_to_cart {
                match cart.product_id {
                    Some(id) => {
                        let outcome = self
                            .dispatcher
                            .dispatch(ToolIntent::AddToCart {
                                id,
                                quantity: cart.quantity.unwrap_or(1),
                            })
                            .await;
                        tracing::debug!(reply = %outcome.reply, "remote cart action");
                    }
                    None => tracing::warn!("remote cart action without usable product id"),
                }
            }

            if let Some(custom) = &actions.custom_action {
                tracing::info!(action = %custom, "remote agent requested custom action");
            }
        }

        Ok(response.message)
    }

    /// Perform a navigation after the configured delay: close the panel,
    /// then route. Cancelled if the panel closes first.
    fn schedule_navigation(&self, route: Route) {
        let shared = Arc::clone(&self.shared);
        let delay = Duration::from_millis(self.config.navigation_delay_ms);

        tokio::spawn(async move {
            let mut closed = shared.closed.subscribe();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    shared.close().await;
                    if let Err(e) = shared.ui.navigate(&route).await {
                        tracing::warn!("navigation failed: {}", e);
                        return;
                    }
                    *shared.current_page.write() = route.clone();
                    let _ = shared.events.send(AdvisorEvent::Navigated(route));
                }
                _ = async { let _ = closed.wait_for(|closed| *closed).await; } => {
                    tracing::debug!("deferred navigation cancelled, panel closed");
                }
            }
        });
    }

    async fn speak(&self, text: &str) {
        if !*self.shared.voice_enabled.read() {
            return;
        }
        let Some(playback) = &self.shared.playback else {
            return;
        };

        let mut closed = self.shared.closed.subscribe();
        tokio::select! {
            result = playback.speak(text) => {
                if let Err(e) = result {
                    tracing::warn!("voice playback failed: {}", e);
                    self.notify_user(VOICE_FAILED).await;
                }
            }
            _ = async { let _ = closed.wait_for(|closed| *closed).await; } => {
                if let Err(e) = playback.stop().await {
                    tracing::warn!("stopping playback failed: {}", e);
                }
            }
        }
    }

    /// Toggle voice replies; toggling off cancels active playback.
    pub async fn set_voice_enabled(&self, enabled: bool) {
        *self.shared.voice_enabled.write() = enabled;
        if !enabled {
            if let Some(playback) = &self.shared.playback {
                if let Err(e) = playback.stop().await {
                    tracing::warn!("stopping playback failed: {}", e);
                }
            }
        }
    }

    pub fn voice_enabled(&self) -> bool {
        *self.shared.voice_enabled.read()
    }

    fn set_recommendations(&self, mut products: Vec<ProductRecord>) {
        products.truncate(MAX_SEARCH_RESULTS);
        let _ = self
            .shared
            .events
            .send(AdvisorEvent::Recommendations(products.clone()));
        *self.shared.recommendations.write() = products;
    }

    fn push_turn(&self, turn: Turn) {
        self.shared.transcript.write().push(turn);
    }

    pub(crate) async fn notify_user(&self, message: &str) {
        if let Err(e) = self.shared.ui.notify(message).await {
            tracing::debug!("notification failed: {}", e);
        }
    }

    /// Interim transcript from speech recognition.
    pub(crate) fn set_live_transcript(&self, text: &str) {
        self.shared.live_transcript.send_replace(text.to_string());
    }

    // Accessors

    pub fn state(&self) -> PanelState {
        *self.shared.state.lock()
    }

    pub fn is_open(&self) -> bool {
        self.state() != PanelState::Closed
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state() == PanelState::Closed
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Transcript {
        self.shared.transcript.read().clone()
    }

    pub fn turn_count(&self) -> usize {
        self.shared.transcript.read().len()
    }

    /// Current recommended products (≤ 3).
    pub fn recommendations(&self) -> Vec<ProductRecord> {
        self.shared.recommendations.read().clone()
    }

    /// Route the storefront is currently on.
    pub fn current_page(&self) -> Route {
        self.shared.current_page.read().clone()
    }

    /// Subscribe to advisor events.
    pub fn subscribe(&self) -> broadcast::Receiver<AdvisorEvent> {
        self.shared.events.subscribe()
    }

    /// Watch the interim speech transcript.
    pub fn live_transcript(&self) -> watch::Receiver<String> {
        self.shared.live_transcript.subscribe()
    }

    /// Watch the panel closed flag (true when closed).
    pub(crate) fn closed_watch(&self) -> watch::Receiver<bool> {
        self.shared.closed.subscribe()
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_catalog::sample_catalog;
    use advisor_core::TurnRole;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingBridge {
        routes: Mutex<Vec<String>>,
        toasts: Mutex<Vec<String>>,
        /// When set, `notify` parks until released.
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl UiBridge for RecordingBridge {
        async fn navigate(&self, route: &Route) -> advisor_core::Result<()> {
            self.routes.lock().push(route.as_path());
            Ok(())
        }

        async fn notify(&self, message: &str) -> advisor_core::Result<()> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.toasts.lock().push(message.to_string());
            Ok(())
        }
    }

    fn advisor_with(bridge: Arc<RecordingBridge>, remote: RemoteAgentConfig) -> ProductAdvisor {
        let config = AdvisorConfig {
            navigation_delay_ms: 20,
            fallback_seed: Some(1),
            ..AdvisorConfig::default()
        };
        ProductAdvisor::new(config, remote, Arc::new(sample_catalog()), bridge)
    }

    fn advisor() -> (ProductAdvisor, Arc<RecordingBridge>) {
        let bridge = Arc::new(RecordingBridge::default());
        (
            advisor_with(bridge.clone(), RemoteAgentConfig::default()),
            bridge,
        )
    }

    #[tokio::test]
    async fn test_greeting_is_seeded() {
        let (advisor, _) = advisor();

        let transcript = advisor.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, TurnRole::Assistant);
        assert_eq!(advisor.state(), PanelState::Closed);
    }

    #[tokio::test]
    async fn test_closed_panel_ignores_submissions() {
        let (advisor, _) = advisor();

        let reply = advisor.process("geh zu warenkorb").await.unwrap();
        assert!(reply.is_none());
        assert_eq!(advisor.turn_count(), 1);
    }

    #[tokio::test]
    async fn test_navigation_turn() {
        let (advisor, _) = advisor();
        advisor.open();

        let reply = advisor.process("geh zu warenkorb").await.unwrap().unwrap();
        assert_eq!(reply, "Ich navigiere zu /cart");

        let transcript = advisor.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1].role, TurnRole::User);
        assert_eq!(transcript.turns()[2].content, reply);
    }

    #[tokio::test]
    async fn test_search_turn_sets_recommendations() {
        let (advisor, _) = advisor();
        advisor.open();

        let reply = advisor
            .process("Zeig mir Produkte für Schmerzen")
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("gefunden"));

        let recommendations = advisor.recommendations();
        assert!(!recommendations.is_empty());
        assert!(recommendations.len() <= MAX_SEARCH_RESULTS);
    }

    #[tokio::test]
    async fn test_fallback_turn() {
        let (advisor, _) = advisor();
        advisor.open();

        let reply = advisor
            .process("was hilft bei schlafproblemen?")
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Schlaf"));
        assert!(!advisor.recommendations().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_is_ordered_after_many_turns() {
        let (advisor, _) = advisor();
        advisor.open();

        let inputs = ["hallo", "was habt ihr gegen schmerzen?", "geh zu warenkorb"];
        for input in inputs {
            advisor.process(input).await.unwrap();
        }

        let transcript = advisor.transcript();
        // Greeting + (user, assistant) per submission.
        assert_eq!(transcript.len(), 1 + inputs.len() * 2);
        assert_eq!(transcript.user_turns(), inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            let turn = &transcript.turns()[1 + i * 2];
            assert_eq!(turn.role, TurnRole::User);
            assert_eq!(turn.content, *input);
        }
    }

    #[tokio::test]
    async fn test_second_submission_in_flight_is_ignored() {
        let gate = Arc::new(Notify::new());
        let bridge = Arc::new(RecordingBridge {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let advisor = Arc::new(advisor_with(bridge, RemoteAgentConfig::default()));
        advisor.open();

        // First turn parks inside the cart notification.
        let first = {
            let advisor = advisor.clone();
            tokio::spawn(async move { advisor.process("produkt 1 in den warenkorb").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(advisor.state(), PanelState::AwaitingResponse);

        // Second submission while the first is in flight: ignored.
        let second = advisor.process("hallo").await.unwrap();
        assert!(second.is_none());

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(first.is_some());

        let transcript = advisor.transcript();
        assert_eq!(transcript.user_turns(), 1);
        assert_eq!(transcript.turns()[1].content, "produkt 1 in den warenkorb");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_navigation_closes_and_routes() {
        let (advisor, bridge) = advisor();
        advisor.open();

        let mut events = advisor.subscribe();
        advisor.process("geh zu warenkorb").await.unwrap();

        // The navigation fires after the configured delay.
        loop {
            match events.recv().await.unwrap() {
                AdvisorEvent::Navigated(route) => {
                    assert_eq!(route, Route::Cart);
                    break;
                }
                _ => continue,
            }
        }

        assert_eq!(advisor.state(), PanelState::Closed);
        assert_eq!(bridge.routes.lock().as_slice(), ["/cart"]);
        assert_eq!(advisor.current_page(), Route::Cart);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_deferred_navigation() {
        let (advisor, bridge) = advisor();
        advisor.open();

        advisor.process("geh zu warenkorb").await.unwrap();
        advisor.close().await;

        // Well past the navigation delay nothing must have navigated.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(bridge.routes.lock().is_empty());
        assert_eq!(advisor.current_page(), Route::Home);
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_local() {
        let bridge = Arc::new(RecordingBridge::default());
        let remote = RemoteAgentConfig {
            enabled: true,
            webhook_url: Some("http://127.0.0.1:1/webhook".to_string()),
            timeout_secs: 1,
            ..RemoteAgentConfig::default()
        };
        let advisor = advisor_with(bridge.clone(), remote);
        advisor.open();

        let reply = advisor.process("geh zu warenkorb").await.unwrap().unwrap();
        assert_eq!(reply, "Ich navigiere zu /cart");

        let toasts = bridge.toasts.lock();
        assert!(toasts.iter().any(|t| t.contains("nicht erreichbar")));
    }
}
