//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_store;
mod speech_synthesizer;

pub use audio_store::{AudioStorePort, StorageError};
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesisError};
