//! HTTP Handlers

mod ping;
mod queue;
mod tts;

pub use ping::*;
pub use queue::*;
pub use tts::*;
