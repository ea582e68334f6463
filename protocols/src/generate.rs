//! Inbound request types for the dialogue generation endpoint.
//!
//! Every field is optional at the serde layer: presence of the required
//! fields is checked by the route handler so that a missing field maps to
//! the fixed validation error instead of a deserialization failure.

use serde::{Deserialize, Serialize};

/// A character participating in the generated dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            personality: None,
            role: None,
        }
    }
}

/// Body of `POST /api/dialogue-generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDialogueRequest {
    /// Human-verification token issued to the browser.
    #[serde(default)]
    pub turnstile_token: Option<String>,

    /// Free-text premise for the dialogue. Required.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Quality tier label (`fast` / `standard` / `creative`). Required.
    #[serde(default)]
    pub model: Option<String>,

    /// ISO language tag for the output language.
    #[serde(default)]
    pub locale: Option<String>,

    /// Characters to feature, in order.
    #[serde(default)]
    pub characters: Vec<Character>,

    /// Dialogue type key (`conversation`, `argument`, ...).
    #[serde(default)]
    pub dialogue_type: Option<String>,

    /// Tone key (`casual`, `formal`, ...).
    #[serde(default)]
    pub tone: Option<String>,

    /// Length key (`short` / `medium` / `long`).
    #[serde(default)]
    pub length: Option<String>,

    /// Free-text scene/setting description.
    #[serde(default)]
    pub setting: Option<String>,

    /// Whether to interleave narrative descriptions with the dialogue.
    #[serde(default)]
    pub include_narration: Option<bool>,
}
