//! Storage Adapter - 音频存储实现

mod azure_blob_store;
mod local_file_store;

pub use azure_blob_store::AzureBlobStore;
pub use local_file_store::LocalFileStore;
