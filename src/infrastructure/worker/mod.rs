//! Worker Layer - Background Task Processing
//!
//! 实现 QueueWorker，处理队列中的文本转语音消息

mod queue_worker;

pub use queue_worker::{MessageOutcome, QueueWorker, QueueWorkerConfig};
