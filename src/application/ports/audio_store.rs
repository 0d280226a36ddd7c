//! Audio Store Port - 出站端口
//!
//! 定义音频对象上传的抽象接口

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::StoredAudioReference;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 对象写入失败（网络、权限、配额等）
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// 容器创建失败（已存在不算失败）
    #[error("Failed to create container {container}: {source}")]
    ContainerCreate {
        container: String,
        #[source]
        source: azure_core::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfig(String),
}

/// Audio Store Port - 出站端口
///
/// 负责把音频字节写入固定容器并返回可解析的 URL
#[async_trait]
pub trait AudioStorePort: Send + Sync {
    /// 上传音频
    ///
    /// 容器不存在时自动创建；对象名由实现随机生成，不会覆盖已有对象
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredAudioReference, StorageError>;

    /// 固定容器名
    fn container(&self) -> &str;
}
