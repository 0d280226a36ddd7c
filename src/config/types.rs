//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音合成配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 队列配置
    #[serde(default)]
    pub queue: QueueConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（本地存储生成下载链接时使用）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 请求体大小上限（字节）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7071
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取公开的 Base URL（不带结尾斜杠）
    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = if self.host == "0.0.0.0" {
                    "localhost"
                } else {
                    &self.host
                };
                format!("http://{}:{}", host, self.port)
            }
        }
    }
}

/// 语音合成服务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// ElevenLabs HTTP API
    ElevenLabs,
    /// 离线假合成，返回固定音频
    Fake,
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_provider")]
    pub provider: TtsProvider,

    /// 服务基础 URL
    #[serde(default = "default_tts_base_url")]
    pub base_url: String,

    /// API Key（`xi-api-key` 请求头）
    #[serde(default)]
    pub api_key: Option<String>,

    /// 固定音色
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_voice_setting")]
    pub stability: f32,

    #[serde(default = "default_voice_setting")]
    pub similarity_boost: f32,

    /// fake 模式下返回的音频文件，不设置则返回内置数据
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,
}

fn default_tts_provider() -> TtsProvider {
    TtsProvider::ElevenLabs
}

fn default_tts_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_voice_setting() -> f32 {
    0.5
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: default_tts_provider(),
            base_url: default_tts_base_url(),
            api_key: None,
            voice_id: default_voice_id(),
            stability: default_voice_setting(),
            similarity_boost: default_voice_setting(),
            fake_audio_path: None,
        }
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Azure Blob Storage
    Azure,
    /// 本地文件系统
    Local,
}

/// 音频存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,

    /// Azure Storage 连接字符串
    #[serde(default)]
    pub connection_string: Option<String>,

    /// 固定容器名
    #[serde(default = "default_container")]
    pub container: String,

    /// 本地存储根目录
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Azure
}

fn default_container() -> String {
    "tts-outputs".to_string()
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("data/blobs")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            connection_string: None,
            container: default_container(),
            local_dir: default_local_dir(),
        }
    }
}

/// 队列配置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// 队列容量
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,

    /// 最大并发处理数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7071);
        assert_eq!(config.tts.provider, TtsProvider::ElevenLabs);
        assert_eq!(config.tts.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.tts.stability, 0.5);
        assert_eq!(config.tts.similarity_boost, 0.5);
        assert_eq!(config.storage.backend, StorageBackend::Azure);
        assert_eq!(config.storage.container, "tts-outputs");
    }

    #[test]
    fn test_public_base_url() {
        let mut config = ServerConfig::default();
        assert_eq!(config.public_base_url(), "http://localhost:7071");

        config.base_url = Some("https://tts.example.com/".to_string());
        assert_eq!(config.public_base_url(), "https://tts.example.com");
    }
}
