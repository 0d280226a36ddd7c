//! Queue Worker - 队列入口
//!
//! 从 MessageQueue 消费消息，交给 SpeechRequestProcessor 处理。
//! 失败只记录日志：不重试、不重新入队、不转发到失败队列

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::application::SpeechRequestProcessor;
use crate::infrastructure::memory::QueueMessage;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct QueueWorkerConfig {
    /// 最大并发处理数
    pub max_concurrent: usize,
}

impl Default for QueueWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl QueueWorkerConfig {
    /// 信号量许可数：至少 1，最多 `u32::MAX`（`acquire_many` 的上限）
    pub fn permits(&self) -> u32 {
        let permits = self.max_concurrent.clamp(1, Semaphore::MAX_PERMITS);
        u32::try_from(permits).unwrap_or(u32::MAX)
    }
}

/// 单条消息的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// 已上传，附带 URL
    Completed(String),
    /// 消息体无效（调用方错误），已丢弃
    Rejected,
    /// 合成或上传失败，已丢弃
    Failed,
}

/// 队列 Worker
pub struct QueueWorker {
    config: QueueWorkerConfig,
    queue_receiver: mpsc::Receiver<QueueMessage>,
    processor: Arc<dyn SpeechRequestProcessor>,
}

impl QueueWorker {
    pub fn new(
        config: QueueWorkerConfig,
        queue_receiver: mpsc::Receiver<QueueMessage>,
        processor: Arc<dyn SpeechRequestProcessor>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            processor,
        }
    }

    /// 启动 Worker
    ///
    /// 所有生产端关闭后退出，退出前等待处理中的消息完成
    pub async fn run(mut self) {
        let permits = self.config.permits();
        tracing::info!(max_concurrent = permits, "QueueWorker started");

        let semaphore = Arc::new(Semaphore::new(permits as usize));

        while let Some(message) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!("Failed to acquire semaphore permit");
                    break;
                }
            };

            let processor = self.processor.clone();
            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到消息处理完成
                Self::handle_message(processor.as_ref(), message).await;
            });
        }

        // 等待处理中的消息
        if let Err(e) = semaphore.acquire_many(permits).await {
            tracing::error!(error = %e, "Failed to wait for in-flight messages");
        }

        tracing::info!("QueueWorker stopped");
    }

    /// 处理单条消息
    pub async fn handle_message(
        processor: &dyn SpeechRequestProcessor,
        message: QueueMessage,
    ) -> MessageOutcome {
        let waited_ms = (chrono::Utc::now() - message.enqueued_at).num_milliseconds();
        tracing::debug!(
            message_id = %message.id,
            body_len = message.body.len(),
            waited_ms = waited_ms,
            "Processing queue message"
        );

        match processor.process(&message.body).await {
            Ok(stored) => {
                tracing::info!(
                    message_id = %message.id,
                    url = %stored.url,
                    "Audio file uploaded successfully"
                );
                MessageOutcome::Completed(stored.into_url())
            }
            Err(e) if e.is_client_error() => {
                tracing::warn!(
                    message_id = %message.id,
                    kind = e.kind(),
                    error = %e,
                    "Dropping queue message with invalid text"
                );
                MessageOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(
                    message_id = %message.id,
                    kind = e.kind(),
                    error = %e,
                    "Queue message processing failed"
                );
                MessageOutcome::Failed
            }
        }
    }
}
