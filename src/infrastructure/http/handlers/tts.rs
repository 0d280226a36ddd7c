//! Text-to-Speech Handler
//!
//! 同步入口：请求体交给 SpeechRequestProcessor，200 返回纯文本 URL

use axum::{body::Bytes, extract::State};
use std::sync::Arc;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// POST /api/http
///
/// 请求体原样传入，不依赖 Content-Type（前端以 text/plain 发送 JSON）
pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<String, ApiError> {
    let stored = state.processor.process(&body).await?;
    Ok(stored.into_url())
}
