//! Domain Layer - 领域层
//!
//! 限界上下文:
//! - Speech Context: 文本转语音请求、合成结果、存储引用

pub mod speech;
