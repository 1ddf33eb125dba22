use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KioskSettings {
    pub port: u16,
    pub assets_directory: PathBuf,
    pub templates_directory: PathBuf,
    pub chromedriver_path: String,
    pub browser_binary_path: Option<String>,
    pub readiness_poll_interval_millis: u64,
    pub readiness_timeout_seconds: u64,
    pub browser_command_timeout_seconds: u64,
    pub max_upload_megabytes: usize,
}

impl Default for KioskSettings {
    fn default() -> Self {
        let (chromedriver_path, browser_binary_path) = platform_browser_paths();

        Self {
            port: global_constants::DEFAULT_HTTP_PORT,
            assets_directory: PathBuf::from(global_constants::DEFAULT_ASSETS_DIRECTORY),
            templates_directory: PathBuf::from(global_constants::DEFAULT_TEMPLATES_DIRECTORY),
            chromedriver_path,
            browser_binary_path,
            readiness_poll_interval_millis: global_constants::DEFAULT_READINESS_POLL_INTERVAL_MILLIS,
            readiness_timeout_seconds: global_constants::DEFAULT_READINESS_TIMEOUT_SECONDS,
            browser_command_timeout_seconds:
                global_constants::DEFAULT_BROWSER_COMMAND_TIMEOUT_SECONDS,
            max_upload_megabytes: global_constants::DEFAULT_MAX_UPLOAD_MEGABYTES,
        }
    }
}

impl KioskSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from_path(&settings_path)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: KioskSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!("[SETTINGS] Port: {}", settings.port);
        log::debug!("[SETTINGS] Assets directory: {:?}", settings.assets_directory);
        log::debug!("[SETTINGS] Chromedriver: {}", settings.chromedriver_path);

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    pub fn readiness_poll_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_poll_interval_millis)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_seconds)
    }

    pub fn browser_command_timeout(&self) -> Duration {
        Duration::from_secs(self.browser_command_timeout_seconds)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_megabytes.saturating_mul(1024 * 1024)
    }

    pub fn local_base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_CONFIG_DIRECTORY);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}

// Raspberry Pi style installs ship chromium and its driver under /usr/bin.
fn platform_browser_paths() -> (String, Option<String>) {
    if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        (
            global_constants::ARM_CHROMEDRIVER_PATH.to_string(),
            Some(global_constants::ARM_BROWSER_BINARY_PATH.to_string()),
        )
    } else {
        (global_constants::DEFAULT_CHROMEDRIVER_PATH.to_string(), None)
    }
}
