//! Quality-tier to upstream-model dispatch.
//!
//! The mapping is a fixed policy: tiers never fail to resolve, and an
//! unrecognized tier label degrades to the standard entry rather than
//! erroring the request.

use serde::{Deserialize, Serialize};

/// User-facing generation quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Fast,
    Standard,
    Creative,
}

impl QualityTier {
    /// Parse a tier label, falling back to `Standard` for unknown input.
    pub fn parse_or_standard(label: &str) -> Self {
        match label {
            "fast" => QualityTier::Fast,
            "creative" => QualityTier::Creative,
            _ => QualityTier::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Fast => "fast",
            QualityTier::Standard => "standard",
            QualityTier::Creative => "creative",
        }
    }
}

/// Concrete upstream model and generation parameters for a tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub model_id: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Resolve a tier into its upstream model and sampling parameters.
///
/// The creative tier runs hotter; everything else uses the default
/// temperature. `max_tokens` is uniform across tiers.
pub fn resolve_model(tier: QualityTier) -> ModelParams {
    let model_id = match tier {
        QualityTier::Fast => "gemini-2.5-flash-lite",
        QualityTier::Standard => "gemini-2.5-flash",
        QualityTier::Creative => "gemini-2.5-flash-think",
    };
    let temperature = match tier {
        QualityTier::Creative => 0.9,
        _ => 0.7,
    };
    ModelParams {
        model_id,
        temperature,
        max_tokens: 4096,
    }
}
