//! In-Memory Message Queue
//!
//! 进程内有界队列：HTTP 入队，QueueWorker 消费

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// 队列消息
///
/// 消息体原样保存，校验由消费端负责
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: Uuid,
    pub body: Vec<u8>,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueMessage {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            body: body.into(),
            enqueued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is full")]
    Full,

    #[error("Queue is closed")]
    Closed,
}

impl QueueError {
    /// 用于日志的失败类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Full => "queue_full",
            Self::Closed => "queue_closed",
        }
    }
}

/// 队列生产端
#[derive(Clone)]
pub struct MessageQueue {
    sender: mpsc::Sender<QueueMessage>,
}

impl MessageQueue {
    /// 创建有界队列，返回生产端与消费端
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<QueueMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// 非阻塞入队
    pub fn enqueue(&self, body: impl Into<Vec<u8>>) -> Result<Uuid, QueueError> {
        let message = QueueMessage::new(body);
        let id = message.id;

        self.sender.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })?;

        tracing::debug!(message_id = %id, "Message enqueued");
        Ok(id)
    }
}
