//! Dialogue generation route: validation, verification gating, upstream
//! dispatch, and stream reframing.

mod handler;
mod streaming;

pub(crate) use handler::generate_dialogue;
