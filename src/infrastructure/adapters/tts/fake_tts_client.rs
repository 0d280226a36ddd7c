//! Fake TTS Client - 离线开发用的合成客户端
//!
//! 始终返回固定的音频数据，不实际调用合成服务

use async_trait::async_trait;
use std::path::PathBuf;

use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::speech::{SpeechText, SynthesisResult};

/// 内置音频：空 ID3v2 标签头
const BUILTIN_AUDIO: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x00";

/// Fake TTS Client 配置
#[derive(Debug, Clone, Default)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频文件路径，未设置时使用内置数据
    pub audio_file_path: Option<PathBuf>,
}

/// Fake TTS Client
pub struct FakeTtsClient {
    /// 缓存的音频数据
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Result<Self, std::io::Error> {
        let audio_data = match &config.audio_file_path {
            Some(path) => std::fs::read(path)?,
            None => BUILTIN_AUDIO.to_vec(),
        };
        tracing::info!(
            path = ?config.audio_file_path,
            audio_size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self { audio_data })
    }

    /// 直接使用给定字节
    pub fn from_bytes(audio_data: impl Into<Vec<u8>>) -> Self {
        Self {
            audio_data: audio_data.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeTtsClient {
    async fn synthesize(&self, text: &SpeechText) -> Result<SynthesisResult, SynthesisError> {
        tracing::debug!(text_len = text.len(), "FakeTtsClient: returning fixed audio");
        Ok(SynthesisResult::mpeg(self.audio_data.clone()))
    }
}
