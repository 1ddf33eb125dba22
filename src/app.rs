use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::adapters::{ChromeDriverLauncher, FileSystemAssetStore, HttpReadinessProbe};
use crate::core::interfaces::ports::{BrowserLauncher, DisplayEnumerator};
use crate::core::models::KioskSettings;
use crate::core::orchestrators::KioskContext;
use crate::global_constants::{DEFAULT_PAGE_TEMPLATE, LOG_TAG_MAIN, STARTUP_BANNER};
use crate::ports::{resolve_local_ip_address, XcapDisplayEnumerator};
use crate::presentation::start_http_server;

pub struct KioskApp {
    context: Arc<KioskContext>,
    launcher: Arc<dyn BrowserLauncher>,
}

impl KioskApp {
    pub async fn build() -> Result<Self> {
        log::info!("{} Initializing kiosk controller", LOG_TAG_MAIN);

        let settings = KioskSettings::load().unwrap_or_else(|e| {
            log::warn!("{} Failed to load settings: {}, using defaults", LOG_TAG_MAIN, e);
            KioskSettings::default()
        });

        Self::build_with(
            settings.clone(),
            &XcapDisplayEnumerator::initialize(),
            Arc::new(ChromeDriverLauncher::new(
                settings.chromedriver_path.clone(),
                settings.browser_binary_path.clone(),
                settings.browser_command_timeout(),
            )?),
        )
        .await
    }

    pub async fn build_with(
        settings: KioskSettings,
        display_enumerator: &dyn DisplayEnumerator,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Result<Self> {
        let displays = display_enumerator
            .enumerate_displays()
            .context("cannot start without any display to drive")?;
        log::info!("{} Driving {} display(s)", LOG_TAG_MAIN, displays.len());

        let asset_store = Arc::new(FileSystemAssetStore::new(&settings.assets_directory));
        let context = Arc::new(KioskContext::build(displays, asset_store, settings));
        context.prepare_display_directories().await?;

        Ok(Self { context, launcher })
    }

    pub async fn run(self) -> Result<()> {
        let mut server_task = self.spawn_http_server();

        self.wait_for_server(&mut server_task).await?;
        log::info!("{} Kiosk server started", LOG_TAG_MAIN);
        println!("{}", STARTUP_BANNER);

        if let Err(e) = self.context.launch_all_windows(self.launcher.as_ref()).await {
            self.context.close_all_windows().await;
            server_task.abort();
            return Err(e);
        }

        let outcome = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                log::info!("{} Shutting down kiosk server", LOG_TAG_MAIN);
                signal.context("failed to listen for Ctrl+C")
            }
            server_result = &mut server_task => flatten_server_result(server_result),
        };

        self.context.close_all_windows().await;
        server_task.abort();
        outcome
    }

    fn spawn_http_server(&self) -> JoinHandle<Result<()>> {
        let context = Arc::clone(&self.context);
        let local_ip_address = resolve_local_ip_address();
        tokio::spawn(start_http_server(context, local_ip_address))
    }

    async fn wait_for_server(&self, server_task: &mut JoinHandle<Result<()>>) -> Result<()> {
        let settings = self.context.settings();
        let probe = HttpReadinessProbe::new(
            settings.readiness_poll_interval(),
            settings.readiness_timeout(),
        );
        let readiness_url = format!("{}/{}", settings.local_base_url(), DEFAULT_PAGE_TEMPLATE);

        tokio::select! {
            ready = probe.wait_until_ready(&readiness_url) => ready,
            server_result = server_task => {
                flatten_server_result(server_result)?;
                anyhow::bail!("http server stopped before it became ready")
            }
        }
    }
}

fn flatten_server_result(result: Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(server_result) => server_result,
        Err(join_error) => Err(anyhow::anyhow!("http server task failed: {}", join_error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::kiosk_window::test_support::{BrowserCall, RecordingBrowserLauncher};
    use crate::core::models::Display;

    struct FixedDisplayEnumerator {
        displays: Vec<Display>,
    }

    impl DisplayEnumerator for FixedDisplayEnumerator {
        fn enumerate_displays(&self) -> Result<Vec<Display>> {
            if self.displays.is_empty() {
                anyhow::bail!("no connected monitors found");
            }
            Ok(self.displays.clone())
        }
    }

    fn create_settings(root: &std::path::Path) -> KioskSettings {
        KioskSettings {
            port: 0,
            assets_directory: root.join("assets"),
            templates_directory: root.join("templates"),
            ..KioskSettings::default()
        }
    }

    #[tokio::test]
    async fn test_build_with_creates_directory_per_display() {
        let root = std::env::temp_dir().join(format!("kiosk-app-test-{}", uuid::Uuid::new_v4()));
        let enumerator = FixedDisplayEnumerator {
            displays: vec![
                Display::at_geometry(0, 0, 0, 1920, 1080),
                Display::at_geometry(1, 1920, 0, 1920, 1080),
            ],
        };

        let app = KioskApp::build_with(
            create_settings(&root),
            &enumerator,
            Arc::new(RecordingBrowserLauncher::default()),
        )
        .await
        .unwrap();

        assert_eq!(app.context.displays().len(), 2);
        assert!(root.join("assets").join("Display 0").is_dir());
        assert!(root.join("assets").join("Display 1").is_dir());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_build_with_without_displays_fails() {
        let root = std::env::temp_dir().join(format!("kiosk-app-test-{}", uuid::Uuid::new_v4()));
        let enumerator = FixedDisplayEnumerator {
            displays: Vec::new(),
        };

        let result = KioskApp::build_with(
            create_settings(&root),
            &enumerator,
            Arc::new(RecordingBrowserLauncher::default()),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_restart_relaunches_display_with_recorded_url() {
        let root = std::env::temp_dir().join(format!("kiosk-app-test-{}", uuid::Uuid::new_v4()));
        let recorded_url = "http://localhost:80/kiosk.html?file=/assets/Display 0/poster.png";
        std::fs::create_dir_all(root.join("assets").join("Display 0")).unwrap();
        std::fs::write(
            root.join("assets").join("Display 0").join("last_url.txt"),
            recorded_url,
        )
        .unwrap();
        let enumerator = FixedDisplayEnumerator {
            displays: vec![Display::at_geometry(0, 0, 0, 1920, 1080)],
        };
        let launcher = RecordingBrowserLauncher::default();

        let app = KioskApp::build_with(create_settings(&root), &enumerator, Arc::new(launcher.clone()))
            .await
            .unwrap();
        app.context
            .launch_all_windows(app.launcher.as_ref())
            .await
            .unwrap();

        assert_eq!(
            launcher.recorded_calls(),
            vec![BrowserCall::Launch(0, recorded_url.to_string())]
        );

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_flatten_server_result_passes_server_error_through() {
        let result = flatten_server_result(Ok(Err(anyhow::anyhow!("address in use"))));

        assert!(result.unwrap_err().to_string().contains("address in use"));
    }
}
