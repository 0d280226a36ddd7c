//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;
use tokio::sync::Semaphore;

use super::types::{AppConfig, StorageBackend, TtsProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 未配置 `tts.api_key` 时读取的环境变量
const LEGACY_API_KEY_VAR: &str = "ElevenLabsApiKey";

/// 未配置 `storage.connection_string` 时读取的环境变量
const LEGACY_CONNECTION_STRING_VAR: &str = "ConnectionString";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TTS_RELAY_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TTS_RELAY_SERVER__PORT=8080`
/// - `TTS_RELAY_TTS__API_KEY=...`
/// - `TTS_RELAY_STORAGE__BACKEND=local`
///
/// 另外兼容 `ElevenLabsApiKey` 与 `ConnectionString` 两个环境变量
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 7071)?
        .set_default("server.max_body_bytes", 1024 * 1024)?
        .set_default("tts.provider", "elevenlabs")?
        .set_default("tts.base_url", "https://api.elevenlabs.io")?
        .set_default("tts.voice_id", "21m00Tcm4TlvDq8ikWAM")?
        .set_default("tts.stability", 0.5)?
        .set_default("tts.similarity_boost", 0.5)?
        .set_default("storage.backend", "azure")?
        .set_default("storage.container", "tts-outputs")?
        .set_default("storage.local_dir", "data/blobs")?
        .set_default("queue.capacity", 1000)?
        .set_default("queue.max_concurrent", 4)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: TTS_RELAY_TTS__VOICE_ID=...
    builder = builder.add_source(
        Environment::with_prefix("TTS_RELAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_legacy_env(&mut app_config, |name| std::env::var(name).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 用旧环境变量补齐未配置的凭据
fn apply_legacy_env(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if is_blank(&config.tts.api_key) {
        config.tts.api_key = lookup(LEGACY_API_KEY_VAR).filter(|v| !v.is_empty());
    }
    if is_blank(&config.storage.connection_string) {
        config.storage.connection_string =
            lookup(LEGACY_CONNECTION_STRING_VAR).filter(|v| !v.is_empty());
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.provider == TtsProvider::ElevenLabs {
        if is_blank(&config.tts.api_key) {
            return Err(ConfigError::ValidationError(format!(
                "TTS API key is not set (tts.api_key or {})",
                LEGACY_API_KEY_VAR
            )));
        }
        if config.tts.base_url.is_empty() || config.tts.voice_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "TTS base URL and voice id cannot be empty".to_string(),
            ));
        }
    }

    if config.storage.backend == StorageBackend::Azure && is_blank(&config.storage.connection_string)
    {
        return Err(ConfigError::ValidationError(format!(
            "Azure Storage connection string is not set (storage.connection_string or {})",
            LEGACY_CONNECTION_STRING_VAR
        )));
    }

    if !is_valid_container_name(&config.storage.container) {
        return Err(ConfigError::ValidationError(format!(
            "Invalid container name: {:?}",
            config.storage.container
        )));
    }

    if config.queue.capacity == 0 || config.queue.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Queue capacity and max_concurrent must be at least 1".to_string(),
        ));
    }

    // 有界队列与 worker 并发都由信号量实现，超出上限会在启动时 panic
    if config.queue.capacity > Semaphore::MAX_PERMITS
        || config.queue.max_concurrent > Semaphore::MAX_PERMITS
    {
        return Err(ConfigError::ValidationError(format!(
            "Queue capacity and max_concurrent must not exceed {}",
            Semaphore::MAX_PERMITS
        )));
    }

    Ok(())
}

/// 容器命名规则：3-63 位小写字母、数字或连字符，字母数字开头结尾，不允许连续连字符
fn is_valid_container_name(name: &str) -> bool {
    (3..=63).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// 打印配置信息（用于启动时日志），凭据不输出
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("TTS Provider: {:?}", config.tts.provider);
    tracing::info!("TTS Base URL: {}", config.tts.base_url);
    tracing::info!("TTS Voice: {}", config.tts.voice_id);
    tracing::info!(
        "TTS API Key: {}",
        if is_blank(&config.tts.api_key) { "not set" } else { "set" }
    );
    tracing::info!("Storage Backend: {:?}", config.storage.backend);
    tracing::info!("Storage Container: {}", config.storage.container);
    if config.storage.backend == StorageBackend::Local {
        tracing::info!("Storage Directory: {:?}", config.storage.local_dir);
    }
    tracing::info!(
        "Queue: capacity={}, max_concurrent={}",
        config.queue.capacity,
        config.queue.max_concurrent
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
