//! HTTP Error Handling
//!
//! 同步入口的错误响应：
//! - 400：纯文本提示
//! - 500：空响应体，细节只写日志
//! - 503：统一 JSON 错误结构

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ProcessingError;
use crate::infrastructure::memory::QueueError;

/// text 缺失或为空时返回给调用方的提示
pub const MISSING_TEXT_MESSAGE: &str = "Please pass a text in the request body.";

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// 失败类别，由 ApiError 写入响应扩展，供日志中间件读取
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureKind(pub &'static str);

/// API 错误
///
/// `kind` 为失败类别（如 `invalid_input`、`storage_failed`、`queue_full`）
#[derive(Debug)]
pub enum ApiError {
    BadRequest { kind: &'static str, message: String },
    Internal { kind: &'static str, detail: String },
    ServiceUnavailable { kind: &'static str, message: String },
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest { kind, .. }
            | ApiError::Internal { kind, .. }
            | ApiError::ServiceUnavailable { kind, .. } => kind,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = FailureKind(self.kind());
        let mut response = match self {
            ApiError::BadRequest { message, .. } => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                message,
            )
                .into_response(),
            ApiError::Internal { kind, detail } => {
                tracing::error!(kind = kind, error = %detail, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ApiError::ServiceUnavailable { message, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(errno::SERVICE_UNAVAILABLE, message)),
            )
                .into_response(),
        };
        response.extensions_mut().insert(kind);
        response
    }
}

impl From<ProcessingError> for ApiError {
    fn from(e: ProcessingError) -> Self {
        if e.is_client_error() {
            tracing::debug!(kind = e.kind(), error = %e, "Rejecting request");
            ApiError::BadRequest {
                kind: e.kind(),
                message: MISSING_TEXT_MESSAGE.to_string(),
            }
        } else {
            ApiError::Internal {
                kind: e.kind(),
                detail: e.to_string(),
            }
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        ApiError::ServiceUnavailable {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}
