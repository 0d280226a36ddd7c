//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping    GET   健康检查
//! - /api/http    POST  文本转语音，返回音频 URL
//! - /api/tts     POST  同 /api/http
//! - /api/queue   POST  消息入队，异步处理

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/http", post(handlers::text_to_speech))
        .route("/tts", post(handlers::text_to_speech))
        .route("/queue", post(handlers::enqueue_message))
}
