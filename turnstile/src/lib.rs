//! Human-verification gate for generation endpoints.
//!
//! This crate provides:
//! - A fail-closed, single-shot verifier against a Turnstile-style
//!   challenge endpoint
//! - An allow-cache abstraction so callers that recently passed
//!   verification skip the network round-trip
//! - An in-process cache implementation for single-node deployments

mod cache;
mod verifier;

pub use cache::{AllowCache, MemoryAllowCache};
pub use verifier::{Outcome, Reason, Verifier, DEFAULT_CACHE_TTL, DEFAULT_VERIFY_URL};
