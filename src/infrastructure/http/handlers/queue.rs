//! Queue Handler
//!
//! 把请求体原样放入 MessageQueue，由 QueueWorker 异步处理

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, EnqueueResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// POST /api/queue
pub async fn enqueue_message(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<EnqueueResponse>>), ApiError> {
    let message_id = state.message_queue.enqueue(body.to_vec())?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(EnqueueResponse { message_id })),
    ))
}
