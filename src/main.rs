//! TTS Relay - 文本转语音中继服务
//!
//! 启动流程：配置 → 日志 → 适配器 → 处理器 → 队列 Worker → HTTP 服务器

use std::sync::Arc;

use anyhow::Context;
use tts_relay::application::{AudioStorePort, SpeechSynthesizerPort, TtsRequestProcessor};
use tts_relay::config::{load_config, print_config, AppConfig, StorageBackend, TtsProvider};
use tts_relay::infrastructure::adapters::{
    AzureBlobStore, ElevenLabsClient, ElevenLabsClientConfig, FakeTtsClient, FakeTtsClientConfig,
    LocalFileStore, VoiceSettings,
};
use tts_relay::infrastructure::http::{AppState, HttpServer, HttpServerConfig};
use tts_relay::infrastructure::memory::MessageQueue;
use tts_relay::infrastructure::worker::{QueueWorker, QueueWorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().context("Failed to load config")?;

    // 初始化日志
    let log_filter = format!(
        "{},tts_relay={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("TTS Relay - 文本转语音中继服务");
    print_config(&config);

    // 进程内共享的 HTTP 客户端
    let client = reqwest::Client::builder()
        .user_agent(concat!("tts-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let synthesizer = create_synthesizer(&config, client.clone())?;
    let audio_store = create_audio_store(&config, client).await?;

    let processor = Arc::new(TtsRequestProcessor::new(synthesizer, audio_store));

    // 创建消息队列并启动 Worker
    let (message_queue, queue_rx) = MessageQueue::channel(config.queue.capacity);
    let worker = QueueWorker::new(
        QueueWorkerConfig {
            max_concurrent: config.queue.max_concurrent,
        },
        queue_rx,
        processor.clone(),
    );
    let worker_handle = tokio::spawn(worker.run());

    // 创建 HTTP 服务器
    let mut server_config = HttpServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    if config.storage.backend == StorageBackend::Local {
        server_config = server_config.with_files_dir(&config.storage.local_dir);
    }

    let server = HttpServer::new(server_config, AppState::new(processor, message_queue));

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 服务器退出后 AppState 中的生产端随之释放，Worker 处理完剩余消息后退出
    worker_handle.await.context("QueueWorker panicked")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn create_synthesizer(
    config: &AppConfig,
    client: reqwest::Client,
) -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let tts = &config.tts;
    match tts.provider {
        TtsProvider::ElevenLabs => {
            let api_key = tts
                .api_key
                .clone()
                .context("tts.api_key is required for the elevenlabs provider")?;
            let client_config = ElevenLabsClientConfig {
                base_url: tts.base_url.clone(),
                api_key,
                voice_id: tts.voice_id.clone(),
                voice_settings: VoiceSettings {
                    stability: tts.stability,
                    similarity_boost: tts.similarity_boost,
                },
            };
            Ok(Arc::new(ElevenLabsClient::new(client, client_config)))
        }
        TtsProvider::Fake => {
            let fake = FakeTtsClient::new(FakeTtsClientConfig {
                audio_file_path: tts.fake_audio_path.clone(),
            })
            .context("Failed to load fake audio file")?;
            Ok(Arc::new(fake))
        }
    }
}

async fn create_audio_store(
    config: &AppConfig,
    client: reqwest::Client,
) -> anyhow::Result<Arc<dyn AudioStorePort>> {
    let storage = &config.storage;
    match storage.backend {
        StorageBackend::Azure => {
            let connection_string = storage
                .connection_string
                .as_deref()
                .context("storage.connection_string is required for the azure backend")?;
            let store = AzureBlobStore::new(client, connection_string, &storage.container)?;
            Ok(Arc::new(store))
        }
        StorageBackend::Local => {
            let store = LocalFileStore::new(
                &storage.local_dir,
                &storage.container,
                config.server.public_base_url(),
            )
            .await?;
            Ok(Arc::new(store))
        }
    }
}
