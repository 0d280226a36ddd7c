//! 应用层错误定义
//!
//! 请求处理流水线的统一错误类型

use thiserror::Error;

use crate::application::ports::{StorageError, SynthesisError};
use crate::domain::speech::SpeechRequestError;

/// 处理错误
///
/// 任何一种都不在本地恢复，也不重试
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// 请求体无法解析
    #[error("Malformed input: {0}")]
    MalformedInput(#[source] SpeechRequestError),

    /// text 缺失或为空
    #[error("Invalid input: {0}")]
    InvalidInput(#[source] SpeechRequestError),

    /// 语音合成失败（单次尝试）
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(#[from] SynthesisError),

    /// 上传失败；已合成的音频随之丢弃
    #[error("Audio storage failed: {0}")]
    StorageFailed(#[from] StorageError),
}

impl ProcessingError {
    /// 日志字段用的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::InvalidInput(_) => "invalid_input",
            Self::SynthesisFailed(_) => "synthesis_failed",
            Self::StorageFailed(_) => "storage_failed",
        }
    }

    /// 是否为调用方的错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedInput(_) | Self::InvalidInput(_))
    }
}

impl From<SpeechRequestError> for ProcessingError {
    fn from(err: SpeechRequestError) -> Self {
        if err.is_invalid_input() {
            Self::InvalidInput(err)
        } else {
            Self::MalformedInput(err)
        }
    }
}
