//! Fail-closed verifier for Turnstile-style challenge tokens.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::AllowCache;

/// Challenge endpoint used when none is configured explicitly.
pub const DEFAULT_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// How long a passed verification exempts the same caller identity from
/// re-verification.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Why a verification passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// No secret configured: verification is operationally bypassed.
    NotConfigured,
    /// Caller identity recently passed verification.
    CacheHit,
    /// The challenge endpoint accepted the token.
    Verified,
    /// The challenge endpoint rejected the token.
    UpstreamRejected,
    /// The challenge endpoint could not be reached or answered garbage.
    UpstreamError,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::NotConfigured => "not-configured",
            Reason::CacheHit => "cache-hit",
            Reason::Verified => "verified",
            Reason::UpstreamRejected => "upstream-rejected",
            Reason::UpstreamError => "upstream-error",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub reason: Reason,
}

impl Outcome {
    fn pass(reason: Reason) -> Self {
        Self {
            passed: true,
            reason,
        }
    }

    fn fail(reason: Reason) -> Self {
        Self {
            passed: false,
            reason,
        }
    }
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
}

/// Single-shot token verifier with an allow-cache front.
///
/// Exactly one upstream call is made per uncached request; transport
/// errors and non-success answers both resolve to a failed outcome. The
/// caller is expected to resubmit with a fresh token rather than retry.
pub struct Verifier {
    secret: Option<String>,
    verify_url: String,
    http: reqwest::Client,
    cache: Arc<dyn AllowCache>,
    cache_ttl: Duration,
}

impl Verifier {
    pub fn new(
        secret: Option<String>,
        verify_url: impl Into<String>,
        http: reqwest::Client,
        cache: Arc<dyn AllowCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            verify_url: verify_url.into(),
            http,
            cache,
            cache_ttl,
        }
    }

    fn identity_key(identity: &str) -> String {
        format!("turnstile:identity:{identity}")
    }

    /// Verify `token` on behalf of `identity`.
    pub async fn verify(&self, token: &str, identity: &str) -> Outcome {
        let Some(secret) = &self.secret else {
            warn!("verification secret not configured, skipping verification");
            return Outcome::pass(Reason::NotConfigured);
        };

        let key = Self::identity_key(identity);
        if self.cache.get(&key).await.is_some() {
            debug!(identity = %identity, "allow-cache hit, skipping challenge endpoint");
            return Outcome::pass(Reason::CacheHit);
        }

        let result = self
            .http
            .post(&self.verify_url)
            .form(&[("secret", secret.as_str()), ("response", token)])
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "challenge endpoint unreachable, failing closed");
                return Outcome::fail(Reason::UpstreamError);
            }
        };

        match response.json::<SiteverifyResponse>().await {
            Ok(body) if body.success => {
                let marker = serde_json::json!({
                    "identity": identity,
                    "verified_at": Utc::now().to_rfc3339(),
                })
                .to_string();
                self.cache.put(&key, marker, self.cache_ttl).await;
                debug!(identity = %identity, "verification passed, allow-cache updated");
                Outcome::pass(Reason::Verified)
            }
            Ok(_) => {
                debug!(identity = %identity, "challenge endpoint rejected token");
                Outcome::fail(Reason::UpstreamRejected)
            }
            Err(e) => {
                warn!(error = %e, "unparseable challenge endpoint response, failing closed");
                Outcome::fail(Reason::UpstreamError)
            }
        }
    }
}
