//! Application State

use std::sync::Arc;

use crate::application::SpeechRequestProcessor;
use crate::infrastructure::memory::MessageQueue;

/// 应用状态
pub struct AppState {
    pub processor: Arc<dyn SpeechRequestProcessor>,
    pub message_queue: MessageQueue,
}

impl AppState {
    pub fn new(processor: Arc<dyn SpeechRequestProcessor>, message_queue: MessageQueue) -> Self {
        Self {
            processor,
            message_queue,
        }
    }
}
