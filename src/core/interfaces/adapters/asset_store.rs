use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::core::models::StagedFile;

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn prepare_display_directory(&self, display_name: &str) -> Result<()>;

    /// Directory for upload bodies still being received. It sits next to the
    /// display directories so a staged file can be renamed into place.
    async fn staging_directory(&self) -> Result<PathBuf>;

    async fn save_asset(
        &self,
        display_name: &str,
        file_name: &str,
        staged_file: &StagedFile,
    ) -> Result<PathBuf>;

    async fn record_last_url(&self, display_name: &str, url: &str) -> Result<()>;

    async fn read_last_url(&self, display_name: &str) -> Result<Option<String>>;
}
