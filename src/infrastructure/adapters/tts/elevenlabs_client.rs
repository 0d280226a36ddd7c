//! ElevenLabs TTS Client - 调用 ElevenLabs 文本转语音 API
//!
//! 实现 SpeechSynthesizerPort trait
//!
//! 外部 API:
//! POST https://api.elevenlabs.io/v1/text-to-speech/{voice_id}
//! Header: xi-api-key
//! Request: {"text": "...", "voice_settings": {"stability": 0.5, "similarity_boost": 0.5}}
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;

use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::speech::{SpeechText, SynthesisResult, AUDIO_MPEG};

const API_KEY_HEADER: &str = "xi-api-key";

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

/// 音色参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 固定音色 ID
    pub voice_id: String,
    pub voice_settings: VoiceSettings,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            voice_settings: VoiceSettings::default(),
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }
}

/// ElevenLabs 客户端
///
/// `Client` 由进程启动时创建并注入，与存储适配器共享连接池
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    pub fn new(client: Client, config: ElevenLabsClientConfig) -> Self {
        Self { client, config }
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ElevenLabsClient {
    async fn synthesize(&self, text: &SpeechText) -> Result<SynthesisResult, SynthesisError> {
        let url = self.synthesize_url();
        let body = SynthesizeRequest {
            text: text.as_str(),
            voice_settings: self.config.voice_settings,
        };

        tracing::debug!(
            url = %url,
            voice_id = %self.config.voice_id,
            text_len = text.len(),
            "Sending ElevenLabs synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, AUDIO_MPEG)
            .json(&body)
            .send()
            .await
            .map_err(SynthesisError::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            voice_id = %self.config.voice_id,
            audio_size = audio_data.len(),
            "ElevenLabs synthesis completed"
        );

        Ok(SynthesisResult::mpeg(audio_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> ElevenLabsClient {
        let config = ElevenLabsClientConfig::new("test-key").with_base_url(server.uri());
        ElevenLabsClient::new(Client::new(), config)
    }

    fn text(s: &str) -> SpeechText {
        SpeechText::new(s).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ElevenLabsClientConfig::default();
        assert_eq!(config.base_url, "https://api.elevenlabs.io");
        assert_eq!(config.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.voice_settings, VoiceSettings::default());
    }

    #[test]
    fn test_synthesize_url() {
        let config = ElevenLabsClientConfig::new("k")
            .with_base_url("http://example.com:9000/")
            .with_voice_id("voice-1");
        let client = ElevenLabsClient::new(Client::new(), config);
        assert_eq!(
            client.synthesize_url(),
            "http://example.com:9000/v1/text-to-speech/voice-1"
        );
    }

    #[tokio::test]
    async fn test_synthesize_sends_expected_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
            .and(header("xi-api-key", "test-key"))
            .and(header("accept", "audio/mpeg"))
            .and(body_json(json!({
                "text": "hello",
                "voice_settings": { "stability": 0.5, "similarity_boost": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).synthesize(&text("hello")).await.unwrap();
        assert_eq!(result.audio_data, b"mp3-bytes");
        assert_eq!(result.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .synthesize(&text("hello"))
            .await
            .unwrap_err();

        match err {
            SynthesisError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let config = ElevenLabsClientConfig::new("k").with_base_url("http://127.0.0.1:1");
        let client = ElevenLabsClient::new(Client::new(), config);

        let err = client.synthesize(&text("hello")).await.unwrap_err();
        assert!(matches!(err, SynthesisError::NetworkError(_)));
        assert_eq!(err.status(), None);
    }
}
