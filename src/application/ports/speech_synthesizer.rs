//! Speech Synthesizer Port - 语音合成抽象
//!
//! 定义文本转语音的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::{SpeechText, SynthesisResult};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// 服务返回非 2xx 状态码
    #[error("Synthesis provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SynthesisError {
    /// 上游返回的状态码（如有）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NetworkError(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidResponse(_) => None,
        }
    }
}

/// Speech Synthesizer Port
///
/// 外部语音合成服务的抽象接口。实现必须无状态、可并发复用，且只发起一次请求
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 将文本合成为 MPEG 音频
    async fn synthesize(&self, text: &SpeechText) -> Result<SynthesisResult, SynthesisError>;
}
