//! Azure Blob Store - Azure Blob Storage 实现
//!
//! 实现 AudioStorePort trait
//!
//! 每次上传：
//! 1. 创建容器（azure_storage_blobs；409 已存在视为成功）
//! 2. 写入 `tts-{uuid}.mp3`（object_store，`PutMode::Create`，不覆盖已有对象）
//!
//! object_store 没有创建容器的接口，因此容器这一步走 Azure SDK

use async_trait::async_trait;
use azure_core::{RetryOptions, StatusCode, TransportOptions};
use azure_storage::{CloudLocation, ConnectionString, StorageCredentials};
use azure_storage_blobs::prelude::{ClientBuilder, ContainerClient};
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::client::{HttpClient, HttpConnector};
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, PutMode, PutOptions, PutPayload,
    RetryConfig,
};
use std::sync::Arc;

use crate::application::ports::{AudioStorePort, StorageError};
use crate::domain::speech::{AudioObjectName, StoredAudioReference};

const EMULATOR_ACCOUNT: &str = "devstoreaccount1";
const EMULATOR_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// 让 object_store 复用进程内共享的 `reqwest::Client`
#[derive(Debug)]
struct SharedHttpConnector(reqwest::Client);

impl HttpConnector for SharedHttpConnector {
    fn connect(&self, _options: &ClientOptions) -> object_store::Result<HttpClient> {
        Ok(HttpClient::new(self.0.clone()))
    }
}

/// 连接字符串中与 Blob 服务相关的部分
#[derive(Clone)]
struct AccountSettings {
    account: String,
    /// Blob 服务端点（不带结尾斜杠）；`None` 表示本地模拟器
    endpoint: Option<String>,
    access_key: Option<String>,
    sas: Option<String>,
}

impl std::fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSettings")
            .field("account", &self.account)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key.as_ref().map(|_| ".."))
            .field("sas", &self.sas.as_ref().map(|_| ".."))
            .finish()
    }
}

impl AccountSettings {
    fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        let parsed = ConnectionString::new(connection_string)
            .map_err(|e| StorageError::InvalidConfig(format!("Invalid connection string: {}", e)))?;

        if parsed.use_development_storage == Some(true) {
            return Ok(Self {
                account: EMULATOR_ACCOUNT.to_string(),
                endpoint: None,
                access_key: None,
                sas: None,
            });
        }

        let endpoint = match (parsed.blob_endpoint, parsed.account_name) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(account)) => format!(
                "https://{}.blob.{}",
                account,
                parsed.endpoint_suffix.unwrap_or(DEFAULT_ENDPOINT_SUFFIX)
            ),
            (None, None) => {
                return Err(StorageError::InvalidConfig(
                    "Connection string needs AccountName or BlobEndpoint".to_string(),
                ))
            }
        };

        let account = match parsed.account_name {
            Some(account) => account.to_string(),
            None => account_from_endpoint(&endpoint).ok_or_else(|| {
                StorageError::InvalidConfig(format!("Cannot derive account from {}", endpoint))
            })?,
        };

        let access_key = parsed.account_key.map(str::to_string);
        let sas = parsed
            .sas
            .map(|token| token.trim_start_matches('?').to_string());

        if access_key.is_none() && sas.is_none() {
            return Err(StorageError::InvalidConfig(
                "Connection string needs AccountKey or SharedAccessSignature".to_string(),
            ));
        }

        Ok(Self {
            account,
            endpoint: Some(endpoint),
            access_key,
            sas,
        })
    }

    fn container_url(&self, container: &str) -> String {
        let endpoint = self.endpoint.as_deref().unwrap_or(EMULATOR_BLOB_ENDPOINT);
        format!("{}/{}", endpoint, container)
    }
}

/// `https://acct.blob.core.windows.net` → `acct`
fn account_from_endpoint(endpoint: &str) -> Option<String> {
    let url = reqwest::Url::parse(endpoint).ok()?;
    url.host_str()?.split('.').next().map(str::to_string)
}

fn build_object_store(
    settings: &AccountSettings,
    container: &str,
    client: reqwest::Client,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let mut builder = MicrosoftAzureBuilder::new()
        .with_account(&settings.account)
        .with_container_name(container)
        .with_http_connector(SharedHttpConnector(client))
        .with_retry(RetryConfig {
            max_retries: 0,
            ..Default::default()
        });

    builder = match &settings.endpoint {
        None => builder.with_use_emulator(true),
        Some(endpoint) => builder
            .with_endpoint(endpoint.clone())
            .with_allow_http(endpoint.starts_with("http://")),
    };
    if let Some(key) = &settings.access_key {
        builder = builder.with_access_key(key);
    }
    if let Some(sas) = &settings.sas {
        builder = builder.with_config(AzureConfigKey::SasKey, sas);
    }

    Ok(Arc::new(builder.build()?))
}

fn build_container_client(
    settings: &AccountSettings,
    container: &str,
    client: reqwest::Client,
) -> Result<ContainerClient, StorageError> {
    let builder = match &settings.endpoint {
        None => ClientBuilder::emulator(),
        Some(endpoint) => {
            let credentials = match (&settings.access_key, &settings.sas) {
                (Some(key), _) => StorageCredentials::access_key(settings.account.clone(), key.clone()),
                (None, Some(sas)) => StorageCredentials::sas_token(sas)
                    .map_err(|e| StorageError::InvalidConfig(format!("Invalid SAS token: {}", e)))?,
                (None, None) => {
                    return Err(StorageError::InvalidConfig(
                        "Missing storage credentials".to_string(),
                    ))
                }
            };
            let location = CloudLocation::Custom {
                account: settings.account.clone(),
                uri: endpoint.clone(),
            };
            ClientBuilder::with_location(location, credentials)
        }
    };

    Ok(builder
        .retry(RetryOptions::none())
        .transport(TransportOptions::new(Arc::new(client)))
        .container_client(container))
}

fn is_conflict(err: &azure_core::Error) -> bool {
    err.as_http_error()
        .map_or(false, |http| http.status() == StatusCode::Conflict)
}

/// Azure Blob 存储
///
/// `Client` 由进程启动时创建并注入，两个 SDK 共用
pub struct AzureBlobStore {
    store: Arc<dyn ObjectStore>,
    container_client: ContainerClient,
    container: String,
    /// 返回给调用方的 URL 前缀，不含 SAS
    container_url: String,
}

impl AzureBlobStore {
    /// 从连接字符串创建
    pub fn new(
        client: reqwest::Client,
        connection_string: &str,
        container: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let container = container.into();
        let settings = AccountSettings::from_connection_string(connection_string)?;

        let store = build_object_store(&settings, &container, client.clone())?;
        let container_client = build_container_client(&settings, &container, client)?;
        let container_url = settings.container_url(&container);

        tracing::info!(
            container_url = %container_url,
            settings = ?settings,
            "AzureBlobStore initialized"
        );

        Ok(Self {
            store,
            container_client,
            container,
            container_url,
        })
    }

    /// 确保容器存在（幂等）
    async fn ensure_container(&self) -> Result<(), StorageError> {
        match self.container_client.create().await {
            Ok(_) => {
                tracing::info!(container = %self.container, "Container created");
                Ok(())
            }
            Err(e) if is_conflict(&e) => Ok(()),
            Err(source) => Err(StorageError::ContainerCreate {
                container: self.container.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl AudioStorePort for AzureBlobStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredAudioReference, StorageError> {
        self.ensure_container().await?;

        let name = AudioObjectName::generate();
        let size = data.len();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            mode: PutMode::Create,
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&ObjectPath::from(name.as_str()), PutPayload::from(data), options)
            .await?;

        tracing::debug!(
            container = %self.container,
            blob = %name,
            size = size,
            "Blob uploaded"
        );

        Ok(StoredAudioReference::new(
            format!("{}/{}", self.container_url, name),
            name.as_str(),
        ))
    }

    fn container(&self) -> &str {
        &self.container
    }
}
