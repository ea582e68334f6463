//! Request handling for the dialogue generation endpoint.
//!
//! One plain async function per processing step, sequenced by the route
//! entry point: validate the body, gate on human verification, check
//! upstream credentials, build the prompt and dispatch, then hand the
//! upstream stream to the reframing layer.

use axum::{extract::State, http::HeaderMap, response::Response, Json};
use dialogue_protocol::GenerateDialogueRequest;
use tracing::{error, info};

use super::streaming::build_streaming_response;
use crate::{
    dispatch::{resolve_model, QualityTier},
    prompt::{build_prompt, PromptOptions},
    routers::error,
    server::AppState,
    upstream::UpstreamError,
};

/// Identity used when no client address can be determined, so local
/// development still exercises the verification cache path.
const DEV_IDENTITY: &str = "dev:local";

/// `POST /api/dialogue-generate`
pub(crate) async fn generate_dialogue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateDialogueRequest>,
) -> Response {
    let (Some(premise), Some(model_label)) = (
        non_empty(request.prompt.as_deref()),
        non_empty(request.model.as_deref()),
    ) else {
        return error::bad_request("Missing required fields");
    };

    let identity = caller_identity(&headers);
    let token = request.turnstile_token.as_deref().unwrap_or("");
    let outcome = state.verifier.verify(token, &identity).await;
    if !outcome.passed {
        info!(
            identity = %identity,
            reason = %outcome.reason,
            "human verification failed"
        );
        return error::forbidden("Turnstile verification failed");
    }

    let Some(completions) = state.completions.as_ref() else {
        error!("upstream API key not configured");
        return error::internal_error("API key not configured");
    };

    let tier = QualityTier::parse_or_standard(model_label);
    let params = resolve_model(tier);
    let prompt = build_prompt(&PromptOptions {
        premise,
        locale: request.locale.as_deref().unwrap_or("en"),
        characters: &request.characters,
        dialogue_type: request.dialogue_type.as_deref(),
        tone: request.tone.as_deref(),
        length: request.length.as_deref(),
        setting: request.setting.as_deref(),
        include_narration: request.include_narration.unwrap_or(true),
    });

    info!(
        tier = %tier.as_str(),
        model = %params.model_id,
        identity = %identity,
        characters = request.characters.len(),
        "dispatching generation request"
    );

    let upstream = match completions
        .stream_chat(
            params.model_id,
            prompt,
            params.temperature,
            params.max_tokens,
        )
        .await
    {
        Ok(response) => response,
        Err(UpstreamError::Status { status, message }) => {
            // The provider's error text stays in the logs.
            error!(status = status, message = %message, "upstream completion error");
            return error::internal_error("Failed to generate dialogue");
        }
        Err(e) => {
            error!(error = %e, "upstream completion request failed");
            return error::internal_error("Failed to generate dialogue");
        }
    };

    build_streaming_response(upstream)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the caller identity for the verification allow-cache:
/// proxy-reported client address first, then the development fallback.
fn caller_identity(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("cf-connecting-ip") {
        return format!("ip:{ip}");
    }
    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(first) = forwarded
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return format!("ip:{first}");
        }
    }
    if let Some(ip) = header("x-real-ip") {
        return format!("ip:{ip}");
    }
    DEV_IDENTITY.to_string()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_identity_prefers_cf_connecting_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("1.2.3.4"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("5.6.7.8"));
        assert_eq!(caller_identity(&headers), "ip:1.2.3.4");
    }

    #[test]
    fn test_identity_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("9.9.9.9, 10.0.0.1"),
        );
        assert_eq!(caller_identity(&headers), "ip:9.9.9.9");
    }

    #[test]
    fn test_identity_falls_back_to_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("2.2.2.2"));
        assert_eq!(caller_identity(&headers), "ip:2.2.2.2");
    }

    #[test]
    fn test_identity_dev_fallback() {
        assert_eq!(caller_identity(&HeaderMap::new()), DEV_IDENTITY);
    }

    #[test]
    fn test_empty_forwarded_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(caller_identity(&headers), DEV_IDENTITY);
    }
}
