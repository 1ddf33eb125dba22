use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::interfaces::adapters::AssetStore;
use crate::core::models::StagedFile;
use crate::global_constants::{LAST_URL_FILE_NAME, LOG_TAG_ASSETS, STAGING_DIRECTORY_NAME};

/// Keeps each display's uploads in `<root>/<display name>/` next to a
/// `last_url.txt` marker.
pub struct FileSystemAssetStore {
    assets_root: PathBuf,
}

impl FileSystemAssetStore {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        let assets_root = assets_root.into();
        log::debug!("{} assets root: {:?}", LOG_TAG_ASSETS, assets_root);
        Self { assets_root }
    }

    fn display_directory(&self, display_name: &str) -> PathBuf {
        self.assets_root.join(display_name)
    }

    fn last_url_path(&self, display_name: &str) -> PathBuf {
        self.display_directory(display_name).join(LAST_URL_FILE_NAME)
    }

    async fn ensure_directory(&self, directory: &Path) -> Result<()> {
        tokio::fs::create_dir_all(directory)
            .await
            .with_context(|| format!("failed to create asset directory {:?}", directory))
    }
}

#[async_trait]
impl AssetStore for FileSystemAssetStore {
    async fn prepare_display_directory(&self, display_name: &str) -> Result<()> {
        self.ensure_directory(&self.display_directory(display_name))
            .await
    }

    async fn staging_directory(&self) -> Result<PathBuf> {
        let directory = self.assets_root.join(STAGING_DIRECTORY_NAME);
        self.ensure_directory(&directory).await?;
        Ok(directory)
    }

    async fn save_asset(
        &self,
        display_name: &str,
        file_name: &str,
        staged_file: &StagedFile,
    ) -> Result<PathBuf> {
        let directory = self.display_directory(display_name);
        self.ensure_directory(&directory).await?;

        let asset_path = directory.join(file_name);
        if let Err(e) = tokio::fs::rename(staged_file.path(), &asset_path).await {
            log::debug!(
                "{} rename of {:?} failed ({}), copying instead",
                LOG_TAG_ASSETS,
                staged_file.path(),
                e
            );
            tokio::fs::copy(staged_file.path(), &asset_path)
                .await
                .with_context(|| format!("failed to write asset {:?}", asset_path))?;
        }

        log::debug!("{} wrote {:?}", LOG_TAG_ASSETS, asset_path);
        Ok(asset_path)
    }

    async fn record_last_url(&self, display_name: &str, url: &str) -> Result<()> {
        self.ensure_directory(&self.display_directory(display_name))
            .await?;

        let marker_path = self.last_url_path(display_name);
        tokio::fs::write(&marker_path, url)
            .await
            .with_context(|| format!("failed to write {:?}", marker_path))
    }

    async fn read_last_url(&self, display_name: &str) -> Result<Option<String>> {
        let marker_path = self.last_url_path(display_name);

        match tokio::fs::read_to_string(&marker_path).await {
            Ok(contents) => {
                let url = contents.trim();
                if url.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(url.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} no last url for {}", LOG_TAG_ASSETS, display_name);
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {:?}", marker_path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_store() -> (FileSystemAssetStore, PathBuf) {
        let temp_dir =
            std::env::temp_dir().join(format!("kiosk-assets-test-{}", uuid::Uuid::new_v4()));
        (FileSystemAssetStore::new(&temp_dir), temp_dir)
    }

    async fn stage(store: &FileSystemAssetStore, contents: &[u8]) -> StagedFile {
        let staging_directory = store.staging_directory().await.unwrap();
        let path = staging_directory.join(uuid::Uuid::new_v4().to_string());
        std::fs::write(&path, contents).unwrap();
        StagedFile::new(path)
    }

    #[tokio::test]
    async fn test_prepare_display_directory_creates_directory() {
        let (store, temp_dir) = create_store();

        store.prepare_display_directory("Display 0").await.unwrap();

        assert!(temp_dir.join("Display 0").is_dir());

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_save_asset_writes_bytes_under_display_directory() {
        let (store, temp_dir) = create_store();

        let staged_file = stage(&store, b"png-bytes").await;

        let saved_path = store
            .save_asset("Display 1", "poster.png", &staged_file)
            .await
            .unwrap();

        assert_eq!(saved_path, temp_dir.join("Display 1").join("poster.png"));
        assert_eq!(std::fs::read(&saved_path).unwrap(), b"png-bytes");
        assert!(!staged_file.path().exists());

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_save_asset_overwrites_same_file_name() {
        let (store, temp_dir) = create_store();

        let first = stage(&store, b"first").await;
        store.save_asset("Display 0", "clip.mp4", &first).await.unwrap();
        let second = stage(&store, b"second").await;
        let saved_path = store
            .save_asset("Display 0", "clip.mp4", &second)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&saved_path).unwrap(), b"second");

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_staging_directory_is_inside_assets_root() {
        let (store, temp_dir) = create_store();

        let staging_directory = store.staging_directory().await.unwrap();

        assert_eq!(staging_directory, temp_dir.join(".incoming"));
        assert!(staging_directory.is_dir());

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_read_last_url_without_marker_returns_none() {
        let (store, temp_dir) = create_store();

        let last_url = store.read_last_url("Display 0").await.unwrap();

        assert_eq!(last_url, None);

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_record_then_read_last_url() {
        let (store, temp_dir) = create_store();
        let url = "http://localhost:80/kiosk.html?file=/assets/Display 0/poster.png";

        store.record_last_url("Display 0", url).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(temp_dir.join("Display 0").join("last_url.txt")).unwrap(),
            url
        );
        assert_eq!(
            store.read_last_url("Display 0").await.unwrap().as_deref(),
            Some(url)
        );

        std::fs::remove_dir_all(&temp_dir).ok();
    }

    #[tokio::test]
    async fn test_read_last_url_with_empty_marker_returns_none() {
        let (store, temp_dir) = create_store();
        store.record_last_url("Display 2", "  \n").await.unwrap();

        let last_url = store.read_last_url("Display 2").await.unwrap();

        assert_eq!(last_url, None);

        std::fs::remove_dir_all(&temp_dir).ok();
    }
}
