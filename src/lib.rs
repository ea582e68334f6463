//! Streaming generation gateway for AI-assisted dialogue writing.
//!
//! Accepts a dialogue premise plus typed style options, gates the request
//! on human verification, composes a model prompt, dispatches to an
//! upstream chat-completion provider with streaming enabled, and reframes
//! the upstream event stream into the line format the front end consumes.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod prompt;
pub mod routers;
pub mod server;
pub mod upstream;
