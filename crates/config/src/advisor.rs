//! Advisor and remote-agent configuration

use serde::{Deserialize, Serialize};

/// Advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Conversation language
    #[serde(default = "default_language")]
    pub language: String,

    /// Greeting seeded as the first assistant turn
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Delay before a requested navigation is performed (panel close +
    /// route change), in milliseconds
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,

    /// Seed for the fallback responder's random sampling branch.
    /// Unset draws a fresh seed per session.
    #[serde(default)]
    pub fallback_seed: Option<u64>,

    /// Voice settings
    #[serde(default)]
    pub voice: VoiceSettings,
}

fn default_language() -> String {
    "de".to_string()
}

fn default_greeting() -> String {
    "Hallo! Ich bin dein Produktberater. Frag mich nach Produkten, Wirkungen oder sag mir einfach, wobei ich helfen kann.".to_string()
}

fn default_navigation_delay_ms() -> u64 {
    1200
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            greeting: default_greeting(),
            navigation_delay_ms: default_navigation_delay_ms(),
            fallback_seed: None,
            voice: VoiceSettings::default(),
        }
    }
}

/// Voice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Whether replies are spoken
    #[serde(default)]
    pub enabled: bool,

    /// Recognition locale
    #[serde(default = "default_voice_locale")]
    pub locale: String,
}

fn default_voice_locale() -> String {
    "de-DE".to_string()
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            locale: default_voice_locale(),
        }
    }
}

/// Remote agent delegation configuration.
///
/// Disabled by default; when disabled, turn processing never leaves the
/// advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAgentConfig {
    /// Whether user turns are delegated to the webhook first
    #[serde(default)]
    pub enabled: bool,

    /// Webhook endpoint
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,

    /// Character budget for the serialized catalog context sent along
    #[serde(default = "default_context_budget_chars")]
    pub context_budget_chars: usize,
}

fn default_remote_timeout_secs() -> u64 {
    10
}

fn default_context_budget_chars() -> usize {
    1000
}

impl Default for RemoteAgentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: None,
            timeout_secs: default_remote_timeout_secs(),
            context_budget_chars: default_context_budget_chars(),
        }
    }
}
