//! Data Transfer Objects

use serde::Serialize;
use uuid::Uuid;

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 入队成功响应
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub message_id: Uuid,
}
