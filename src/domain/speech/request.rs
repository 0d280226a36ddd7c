//! Speech Context - 入站请求契约

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use super::{SpeechRequestError, SpeechText};

/// 文本转语音请求
///
/// HTTP 请求体与队列消息共用的 JSON 结构：`{ "text": string }`。
/// 字段名不区分大小写，重复出现时以最后一个为准，其余字段忽略。
#[derive(Debug, Clone, Default)]
pub struct TextToSpeechRequest {
    pub text: Option<String>,
}

impl<'de> Deserialize<'de> for TextToSpeechRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = TextToSpeechRequest;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut text = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key.eq_ignore_ascii_case("text") {
                        // null 覆盖之前的值，视为缺失
                        text = map.next_value::<Option<String>>()?;
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(TextToSpeechRequest { text })
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

impl TextToSpeechRequest {
    /// 从原始消息体解析并校验
    ///
    /// - 空白请求体、JSON `null`、缺失或为 `null` 的 `text` → `MissingText`
    /// - 空字符串 → `EmptyText`
    /// - 非 JSON 或 `text` 不是字符串 → `Malformed`
    pub fn parse(raw: &[u8]) -> Result<SpeechText, SpeechRequestError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(SpeechRequestError::MissingText);
        }

        let request: Option<Self> =
            serde_json::from_slice(raw).map_err(SpeechRequestError::Malformed)?;

        let text = request
            .and_then(|r| r.text)
            .ok_or(SpeechRequestError::MissingText)?;

        SpeechText::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_request() {
        let text = TextToSpeechRequest::parse(br#"{"text":"hello"}"#).unwrap();
        assert_eq!(text.as_str(), "hello");
    }

    #[test]
    fn test_parse_accepts_capitalized_field_and_ignores_extras() {
        let text =
            TextToSpeechRequest::parse(br#"{"Text":"hi there","voice":"ignored"}"#).unwrap();
        assert_eq!(text.as_str(), "hi there");
    }

    #[test]
    fn test_parse_matches_field_name_case_insensitively() {
        let upper = TextToSpeechRequest::parse(br#"{"TEXT":"upper"}"#).unwrap();
        assert_eq!(upper.as_str(), "upper");

        let mixed = TextToSpeechRequest::parse(br#"{"tExt":"mixed"}"#).unwrap();
        assert_eq!(mixed.as_str(), "mixed");
    }

    #[test]
    fn test_parse_duplicate_keys_last_one_wins() {
        let text = TextToSpeechRequest::parse(br#"{"text":"a","Text":"b"}"#).unwrap();
        assert_eq!(text.as_str(), "b");

        assert!(matches!(
            TextToSpeechRequest::parse(br#"{"text":"a","TEXT":null}"#),
            Err(SpeechRequestError::MissingText)
        ));
    }

    #[test]
    fn test_parse_non_string_under_any_casing_is_malformed() {
        let err = TextToSpeechRequest::parse(br#"{"TeXt":["a"]}"#).unwrap_err();
        assert!(matches!(err, SpeechRequestError::Malformed(_)));
    }

    #[test]
    fn test_parse_missing_text() {
        let err = TextToSpeechRequest::parse(br#"{"other":1}"#).unwrap_err();
        assert!(matches!(err, SpeechRequestError::MissingText));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_parse_null_body_and_null_text() {
        assert!(matches!(
            TextToSpeechRequest::parse(b"null"),
            Err(SpeechRequestError::MissingText)
        ));
        assert!(matches!(
            TextToSpeechRequest::parse(br#"{"text":null}"#),
            Err(SpeechRequestError::MissingText)
        ));
    }

    #[test]
    fn test_parse_blank_body() {
        assert!(matches!(
            TextToSpeechRequest::parse(b""),
            Err(SpeechRequestError::MissingText)
        ));
        assert!(matches!(
            TextToSpeechRequest::parse(b" \n"),
            Err(SpeechRequestError::MissingText)
        ));
    }

    #[test]
    fn test_parse_empty_text() {
        let err = TextToSpeechRequest::parse(br#"{"text":""}"#).unwrap_err();
        assert!(matches!(err, SpeechRequestError::EmptyText));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_parse_malformed() {
        let bodies: [&[u8]; 4] = [b"not json", br#"{"text":42}"#, br#""hello""#, b"{"];
        for body in bodies {
            let err = TextToSpeechRequest::parse(body).unwrap_err();
            assert!(matches!(err, SpeechRequestError::Malformed(_)));
            assert!(!err.is_invalid_input());
        }
    }
}
