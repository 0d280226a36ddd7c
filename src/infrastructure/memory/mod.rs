//! Memory Layer - 进程内状态
//!
//! 实现 MessageQueue，在 HTTP 入口与 QueueWorker 之间传递消息

mod message_queue;

pub use message_queue::{MessageQueue, QueueError, QueueMessage};
