//! Speech Context - Value Objects

use uuid::Uuid;

use super::SpeechRequestError;

/// 合成音频的固定 MIME 类型
pub const AUDIO_MPEG: &str = "audio/mpeg";

const OBJECT_PREFIX: &str = "tts-";
const OBJECT_EXTENSION: &str = ".mp3";

/// 待合成文本（非空）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText(String);

impl SpeechText {
    /// 空字符串视为无效；仅含空白的文本仍然有效
    pub fn new(text: impl Into<String>) -> Result<Self, SpeechRequestError> {
        let text = text.into();
        if text.is_empty() {
            return Err(SpeechRequestError::EmptyText);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 文本字节长度
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SpeechText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 合成结果
///
/// 原始音频字节 + MIME 类型，只在一次处理流程内短暂持有
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    pub audio_data: Vec<u8>,
    pub content_type: &'static str,
}

impl SynthesisResult {
    /// 以 `audio/mpeg` 包装音频数据
    pub fn mpeg(audio_data: impl Into<Vec<u8>>) -> Self {
        Self {
            audio_data: audio_data.into(),
            content_type: AUDIO_MPEG,
        }
    }

    pub fn len(&self) -> usize {
        self.audio_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio_data.is_empty()
    }
}

/// 音频对象名：`tts-{uuid}.mp3`
///
/// 每次上传随机生成，调用方无法指定，因此不会覆盖已有对象
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioObjectName(String);

impl AudioObjectName {
    pub fn generate() -> Self {
        Self(format!("{}{}{}", OBJECT_PREFIX, Uuid::new_v4(), OBJECT_EXTENSION))
    }

    /// 校验名称是否符合 `tts-{uuid}.mp3` 格式
    pub fn parse(name: &str) -> Option<Self> {
        let id = name
            .strip_prefix(OBJECT_PREFIX)?
            .strip_suffix(OBJECT_EXTENSION)?;
        Uuid::parse_str(id).ok()?;
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已存储音频的引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudioReference {
    /// 可公开解析的对象 URL
    pub url: String,
    /// 对象名（仅用于日志）
    pub object_name: String,
}

impl StoredAudioReference {
    pub fn new(url: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            object_name: object_name.into(),
        }
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl std::fmt::Display for StoredAudioReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_text_rejects_empty() {
        assert!(matches!(
            SpeechText::new(""),
            Err(SpeechRequestError::EmptyText)
        ));
    }

    #[test]
    fn test_speech_text_keeps_whitespace() {
        let text = SpeechText::new("  ").unwrap();
        assert_eq!(text.as_str(), "  ");
        assert_eq!(text.len(), 2);
    }

    #[test]
    fn test_generated_names_are_unique_and_parseable() {
        let a = AudioObjectName::generate();
        let b = AudioObjectName::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tts-"));
        assert!(a.as_str().ends_with(".mp3"));
        assert_eq!(AudioObjectName::parse(a.as_str()), Some(a));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        assert!(AudioObjectName::parse("tts-not-a-uuid.mp3").is_none());
        assert!(AudioObjectName::parse("speech.mp3").is_none());
        assert!(AudioObjectName::parse(&format!("tts-{}.wav", Uuid::new_v4())).is_none());
    }

    #[test]
    fn test_synthesis_result_is_mpeg() {
        let result = SynthesisResult::mpeg(b"ID3".to_vec());
        assert_eq!(result.content_type, "audio/mpeg");
        assert_eq!(result.len(), 3);
    }
}
