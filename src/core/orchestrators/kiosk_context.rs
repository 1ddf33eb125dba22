use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::interfaces::adapters::AssetStore;
use crate::core::interfaces::ports::BrowserLauncher;
use crate::core::models::{
    Display, DisplayNameEntry, KioskSettings, KioskWindow, UploadReceipt, ValidatedUpload,
};
use crate::global_constants::{LOG_TAG_BROWSER, LOG_TAG_UPLOAD};

/// Everything request handlers and the lifecycle share: the enumerated
/// displays, one window per display, and the asset store.
///
/// Each window sits behind its own mutex. An upload holds that lock across the
/// asset write, the marker write and the refresh, so uploads to one display are
/// applied one at a time while other displays proceed independently.
pub struct KioskContext {
    displays: Vec<Display>,
    windows: Vec<Mutex<KioskWindow>>,
    asset_store: Arc<dyn AssetStore>,
    settings: KioskSettings,
}

impl KioskContext {
    pub fn build(
        displays: Vec<Display>,
        asset_store: Arc<dyn AssetStore>,
        settings: KioskSettings,
    ) -> Self {
        let local_base_url = settings.local_base_url();
        let windows = displays
            .iter()
            .cloned()
            .map(|display| Mutex::new(KioskWindow::for_display(display, &local_base_url)))
            .collect();

        Self {
            displays,
            windows,
            asset_store,
            settings,
        }
    }

    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    pub fn settings(&self) -> &KioskSettings {
        &self.settings
    }

    pub fn display_name_entries(&self) -> Vec<DisplayNameEntry> {
        self.displays.iter().map(DisplayNameEntry::from).collect()
    }

    pub fn kiosk_url_for_asset(&self, display_name: &str, file_name: &str) -> String {
        format!(
            "{}/kiosk.html?file=/assets/{}/{}",
            self.settings.local_base_url(),
            display_name,
            file_name
        )
    }

    pub async fn staging_directory(&self) -> Result<PathBuf> {
        self.asset_store.staging_directory().await
    }

    pub async fn prepare_display_directories(&self) -> Result<()> {
        for display in &self.displays {
            self.asset_store
                .prepare_display_directory(&display.name())
                .await?;
        }
        Ok(())
    }

    /// Launches every window, replaying the last shown URL where one was recorded.
    pub async fn launch_all_windows(&self, launcher: &dyn BrowserLauncher) -> Result<()> {
        for window in &self.windows {
            let mut window = window.lock().await;
            let display_name = window.display().name();

            let last_url = match self.asset_store.read_last_url(&display_name).await {
                Ok(last_url) => last_url,
                Err(e) => {
                    log::warn!(
                        "{} Could not read last url for {}: {}",
                        LOG_TAG_BROWSER,
                        display_name,
                        e
                    );
                    None
                }
            };

            if let Some(url) = &last_url {
                log::info!("{} Found last url for {}: {}", LOG_TAG_BROWSER, display_name, url);
            }

            window
                .launch(launcher, last_url.as_deref())
                .await
                .with_context(|| format!("failed to launch kiosk for {}", display_name))?;
        }
        Ok(())
    }

    pub async fn close_all_windows(&self) {
        for window in &self.windows {
            let mut window = window.lock().await;
            if let Err(e) = window.close().await {
                log::warn!(
                    "{} Failed to close kiosk on display {}: {}",
                    LOG_TAG_BROWSER,
                    window.display().id,
                    e
                );
            }
        }
    }

    /// Stores the upload, records it as the display's last URL and points the
    /// display's browser at it. Only storage failures are errors: a browser
    /// that cannot be refreshed still shows the content after the next restart.
    pub async fn accept_upload(&self, upload: ValidatedUpload) -> Result<UploadReceipt> {
        let window = self
            .windows
            .get(upload.display.id)
            .ok_or_else(|| anyhow::anyhow!("no window for display {}", upload.display.id))?;
        let window = window.lock().await;

        let display_name = upload.display.name();
        let saved_path = self
            .asset_store
            .save_asset(&display_name, &upload.file_name, &upload.staged_file)
            .await?;
        log::info!(
            "{} Saved {} bytes to {:?}",
            LOG_TAG_UPLOAD,
            upload.staged_file.size(),
            saved_path
        );

        let kiosk_url = self.kiosk_url_for_asset(&display_name, &upload.file_name);
        self.asset_store
            .record_last_url(&display_name, &kiosk_url)
            .await?;

        if let Err(e) = window.refresh(&kiosk_url).await {
            log::error!(
                "{} Failed to refresh {} after upload: {}",
                LOG_TAG_UPLOAD,
                display_name,
                e
            );
        }

        Ok(UploadReceipt::for_display(&upload.display))
    }
}
