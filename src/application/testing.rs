//! 测试用的端口桩实现

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    AudioStorePort, SpeechSynthesizerPort, StorageError, SynthesisError,
};
use crate::domain::speech::{AudioObjectName, SpeechText, StoredAudioReference, SynthesisResult};

pub(crate) const AUDIO_BYTES: &[u8] = b"ID3\x04\x00fake-mpeg-frames";

/// 记录调用次数的合成桩
pub(crate) struct StubSynthesizer {
    failure_status: Option<u16>,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl StubSynthesizer {
    pub(crate) fn ok() -> Self {
        Self {
            failure_status: None,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::ok()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for StubSynthesizer {
    async fn synthesize(&self, text: &SpeechText) -> Result<SynthesisResult, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.as_str().to_string());

        match self.failure_status {
            Some(status) => Err(SynthesisError::Status {
                status,
                body: "provider unavailable".to_string(),
            }),
            None => Ok(SynthesisResult::mpeg(AUDIO_BYTES)),
        }
    }
}

/// 返回 `https://store.example/tts-<uuid>.mp3` 的存储桩
pub(crate) struct StubAudioStore {
    fail: bool,
    calls: AtomicUsize,
    uploads: Mutex<Vec<(Vec<u8>, String)>>,
}

impl StubAudioStore {
    pub(crate) fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn uploads(&self) -> Vec<(Vec<u8>, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioStorePort for StubAudioStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredAudioReference, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "AuthorizationFailure",
            )));
        }

        self.uploads
            .lock()
            .unwrap()
            .push((data, content_type.to_string()));

        let name = AudioObjectName::generate();
        Ok(StoredAudioReference::new(
            format!("https://store.example/{}", name),
            name.as_str(),
        ))
    }

    fn container(&self) -> &str {
        "tts-outputs"
    }
}
