//! Local File Store - 文件系统音频存储实现
//!
//! 实现 AudioStorePort trait，离线开发时替代 Azure Blob
//!
//! 目录布局：`{base_dir}/{container}/tts-{uuid}.mp3`，
//! 由 HTTP 服务的 `/files` 路由对外提供

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioStorePort, StorageError};
use crate::domain::speech::{AudioObjectName, StoredAudioReference};

/// 文件系统音频存储
pub struct LocalFileStore {
    /// 容器目录 (`base_dir/container`)
    container_dir: PathBuf,
    container: String,
    /// 对外可访问的服务地址，不带结尾斜杠
    public_base_url: String,
}

impl LocalFileStore {
    /// 创建新的文件存储，并确保容器目录存在
    pub async fn new(
        base_dir: impl AsRef<Path>,
        container: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let container = container.into();
        let container_dir = base_dir.as_ref().join(&container);

        fs::create_dir_all(&container_dir).await?;

        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();

        tracing::info!(
            dir = %container_dir.display(),
            public_base_url = %public_base_url,
            "LocalFileStore initialized"
        );

        Ok(Self {
            container_dir,
            container,
            public_base_url,
        })
    }

    pub fn container_dir(&self) -> &Path {
        &self.container_dir
    }
}

#[async_trait]
impl AudioStorePort for LocalFileStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredAudioReference, StorageError> {
        let name = AudioObjectName::generate();
        let path = self.container_dir.join(name.as_str());

        fs::write(&path, &data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Saved audio file"
        );

        let url = format!(
            "{}/files/{}/{}",
            self.public_base_url, self.container, name
        );
        Ok(StoredAudioReference::new(url, name.as_str()))
    }

    fn container(&self) -> &str {
        &self.container
    }
}
