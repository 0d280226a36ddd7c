//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、AudioStore）
//! - processor: 文本转语音请求处理流程
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod processor;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ProcessingError;

pub use ports::{AudioStorePort, SpeechSynthesizerPort, StorageError, SynthesisError};

pub use processor::{SpeechRequestProcessor, TtsRequestProcessor};
