//! Speech Context - 文本转语音

mod errors;
mod request;
mod value_objects;

pub use errors::SpeechRequestError;
pub use request::TextToSpeechRequest;
pub use value_objects::{
    AudioObjectName, SpeechText, StoredAudioReference, SynthesisResult, AUDIO_MPEG,
};
