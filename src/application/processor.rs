//! Request Processor - 文本转语音请求处理
//!
//! HTTP 与队列两个入口共用的处理流程：
//! 解析 → 校验 → 合成 → 上传 → 返回 URL
//!
//! 合成与上传之间没有事务关联：上传失败时已合成的音频直接丢弃，不重试

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::error::ProcessingError;
use crate::application::ports::{AudioStorePort, SpeechSynthesizerPort};
use crate::domain::speech::{StoredAudioReference, SynthesisResult, TextToSpeechRequest};

/// 入站消息处理能力
///
/// 各传输层适配器（HTTP、队列）只依赖此 trait
#[async_trait]
pub trait SpeechRequestProcessor: Send + Sync {
    async fn process(&self, raw_body: &[u8]) -> Result<StoredAudioReference, ProcessingError>;
}

/// 默认处理器：合成服务 + 音频存储
pub struct TtsRequestProcessor {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    audio_store: Arc<dyn AudioStorePort>,
}

impl TtsRequestProcessor {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        audio_store: Arc<dyn AudioStorePort>,
    ) -> Self {
        Self {
            synthesizer,
            audio_store,
        }
    }
}

#[async_trait]
impl SpeechRequestProcessor for TtsRequestProcessor {
    async fn process(&self, raw_body: &[u8]) -> Result<StoredAudioReference, ProcessingError> {
        let text = TextToSpeechRequest::parse(raw_body)?;

        tracing::info!(text_len = text.len(), "Synthesizing speech");

        let synthesis = self.synthesizer.synthesize(&text).await.map_err(|e| {
            tracing::error!(error = %e, status = ?e.status(), "Speech synthesis failed");
            ProcessingError::SynthesisFailed(e)
        })?;

        tracing::debug!(audio_size = synthesis.len(), "Speech synthesized");

        let SynthesisResult {
            audio_data,
            content_type,
        } = synthesis;

        let stored = self
            .audio_store
            .upload(audio_data, content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %self.audio_store.container(),
                    "Audio upload failed, discarding synthesized audio"
                );
                ProcessingError::StorageFailed(e)
            })?;

        tracing::info!(
            url = %stored.url,
            object_name = %stored.object_name,
            "Audio stored"
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{StubAudioStore, StubSynthesizer, AUDIO_BYTES};
    use crate::application::ports::SynthesisError;
    use crate::domain::speech::{AudioObjectName, SpeechText};

    fn processor(
        synthesizer: &Arc<StubSynthesizer>,
        store: &Arc<StubAudioStore>,
    ) -> TtsRequestProcessor {
        TtsRequestProcessor::new(synthesizer.clone(), store.clone())
    }

    fn object_name_of(url: &str) -> &str {
        url.rsplit('/').next().unwrap()
    }

    #[tokio::test]
    async fn test_process_success_returns_stored_url() {
        let synthesizer = Arc::new(StubSynthesizer::ok());
        let store = Arc::new(StubAudioStore::ok());

        let stored = processor(&synthesizer, &store)
            .process(br#"{"text":"hello"}"#)
            .await
            .unwrap();

        assert!(stored.url.starts_with("https://store.example/"));
        assert!(AudioObjectName::parse(object_name_of(&stored.url)).is_some());
        assert_eq!(synthesizer.texts(), vec!["hello".to_string()]);

        let uploads = store.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, AUDIO_BYTES);
        assert_eq!(uploads[0].1, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_outbound_calls() {
        let synthesizer = Arc::new(StubSynthesizer::ok());
        let store = Arc::new(StubAudioStore::ok());
        let processor = processor(&synthesizer, &store);

        let bodies: [&[u8]; 3] = [br#"{"text":""}"#, br#"{}"#, b""];
        for body in bodies {
            let err = processor.process(body).await.unwrap_err();
            assert!(matches!(err, ProcessingError::InvalidInput(_)));
        }

        assert_eq!(synthesizer.calls(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_input_makes_no_outbound_calls() {
        let synthesizer = Arc::new(StubSynthesizer::ok());
        let store = Arc::new(StubAudioStore::ok());

        let err = processor(&synthesizer, &store)
            .process(b"{\"text\": ")
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::MalformedInput(_)));
        assert_eq!(synthesizer.calls(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_synthesis_failure_skips_store() {
        let synthesizer = Arc::new(StubSynthesizer::failing(500));
        let store = Arc::new(StubAudioStore::ok());

        let err = processor(&synthesizer, &store)
            .process(br#"{"text":"hello"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::SynthesisFailed(_)));
        assert_eq!(synthesizer.calls(), 1);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_retry_synthesis() {
        let synthesizer = Arc::new(StubSynthesizer::ok());
        let store = Arc::new(StubAudioStore::failing());

        let err = processor(&synthesizer, &store)
            .process(br#"{"text":"hello"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::StorageFailed(_)));
        assert_eq!(synthesizer.calls(), 1);
        assert_eq!(store.calls(), 1);
    }

    struct OggSynthesizer;

    #[async_trait]
    impl SpeechSynthesizerPort for OggSynthesizer {
        async fn synthesize(
            &self,
            _text: &SpeechText,
        ) -> Result<SynthesisResult, SynthesisError> {
            Ok(SynthesisResult {
                audio_data: b"OggS".to_vec(),
                content_type: "audio/ogg",
            })
        }
    }

    #[tokio::test]
    async fn test_upload_uses_content_type_reported_by_synthesizer() {
        let store = Arc::new(StubAudioStore::ok());
        let processor = TtsRequestProcessor::new(Arc::new(OggSynthesizer), store.clone());

        processor.process(br#"{"text":"hello"}"#).await.unwrap();

        let uploads = store.uploads();
        assert_eq!(uploads[0].0, b"OggS");
        assert_eq!(uploads[0].1, "audio/ogg");
    }

    #[tokio::test]
    async fn test_identical_concurrent_requests_get_distinct_urls() {
        let synthesizer = Arc::new(StubSynthesizer::ok());
        let store = Arc::new(StubAudioStore::ok());
        let processor = processor(&synthesizer, &store);

        let body = br#"{"text":"same text"}"#;
        let (a, b) = tokio::join!(processor.process(body), processor.process(body));

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.url, b.url);
        assert_eq!(synthesizer.calls(), 2);
        assert_eq!(store.calls(), 2);
    }
}
