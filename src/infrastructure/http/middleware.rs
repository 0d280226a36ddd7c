//! HTTP Middleware
//!
//! 失败请求日志：路由模板 + 失败类别 + 耗时

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Level;

use super::error::FailureKind;

/// 没有经过 ApiError 的失败（如请求体超限）
const UNCLASSIFIED: &str = "unclassified";

/// 状态码对应的日志级别；成功响应不记录
fn severity(status: StatusCode) -> Option<Level> {
    if status.is_server_error() {
        Some(Level::ERROR)
    } else if status.is_client_error() {
        Some(Level::WARN)
    } else {
        None
    }
}

/// 失败请求日志中间件
///
/// `route` 取匹配的路由模板（未匹配时取原始路径），
/// `kind` 取 ApiError 写入的 [`FailureKind`]
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    let Some(level) = severity(status) else {
        return response;
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let kind = response
        .extensions()
        .get::<FailureKind>()
        .map_or(UNCLASSIFIED, |k| k.0);

    if level == Level::ERROR {
        tracing::error!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            kind = kind,
            elapsed_ms = elapsed_ms,
            "Request failed"
        );
    } else {
        tracing::warn!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            kind = kind,
            elapsed_ms = elapsed_ms,
            "Request rejected"
        );
    }

    response
}
