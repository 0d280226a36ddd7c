//! TTS Relay - 文本转语音中继服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech Context: 请求解析、待合成文本、音频对象名
//!
//! 应用层 (application/):
//! - Ports: SpeechSynthesizer, AudioStore
//! - Processor: 解析 → 合成 → 上传 → 返回 URL
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 同步入口 + 入队接口
//! - Memory: 进程内消息队列
//! - Worker: QueueWorker 队列入口
//! - Adapters: ElevenLabs / Fake 合成客户端，Azure Blob / 本地文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
