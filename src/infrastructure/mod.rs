//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现以及两个传输入口

pub mod adapters;
pub mod http;
pub mod memory;
pub mod worker;

pub use memory::MessageQueue;
pub use worker::{QueueWorker, QueueWorkerConfig};
