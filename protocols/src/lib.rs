//! Protocol definitions for the dialogue generation API.
//!
//! `generate` holds the inbound request types accepted by the gateway;
//! `completion` holds the OpenAI-compatible wire types exchanged with the
//! upstream chat-completion provider.

pub mod completion;
pub mod generate;

pub use completion::{
    ChatCompletionChunk, ChatCompletionRequest, ChatMessage, MessageDelta, StreamChoice,
};
pub use generate::{Character, GenerateDialogueRequest};
