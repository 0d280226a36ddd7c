//! Speech Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechRequestError {
    /// 请求体无法解析为 `{ "text": string }`
    #[error("请求体格式错误: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("请求体缺少 text 字段")]
    MissingText,

    #[error("text 不能为空")]
    EmptyText,
}

impl SpeechRequestError {
    /// 是否为可解析但内容无效的请求
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::MissingText | Self::EmptyText)
    }
}
