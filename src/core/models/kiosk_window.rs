use anyhow::Result;

use crate::core::interfaces::ports::{BrowserLauncher, KioskSession};
use crate::core::models::Display;
use crate::global_constants::{DEFAULT_PAGE_TEMPLATE, LOG_TAG_BROWSER};

/// One full-screen browser per display. Starts unlaunched; `launch` moves it to
/// launched and there is no way back short of `close`.
pub struct KioskWindow {
    display: Display,
    default_url: String,
    session: Option<Box<dyn KioskSession>>,
}

impl std::fmt::Debug for KioskWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskWindow")
            .field("display", &self.display)
            .field("default_url", &self.default_url)
            .field("launched", &self.is_launched())
            .finish()
    }
}

impl KioskWindow {
    pub fn for_display(display: Display, local_base_url: &str) -> Self {
        let default_url = format!(
            "{}/{}?displayId={}",
            local_base_url, DEFAULT_PAGE_TEMPLATE, display.id
        );

        Self {
            display,
            default_url,
            session: None,
        }
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    pub fn is_launched(&self) -> bool {
        self.session.is_some()
    }

    pub async fn launch(&mut self, launcher: &dyn BrowserLauncher, url: Option<&str>) -> Result<()> {
        if self.is_launched() {
            anyhow::bail!("window for display {} is already launched", self.display.id);
        }

        let target_url = url.unwrap_or(&self.default_url).to_string();
        log::info!(
            "{} Launching kiosk on display {}: {}",
            LOG_TAG_BROWSER,
            self.display.id,
            target_url
        );

        let session = launcher.launch_kiosk_session(&self.display, &target_url).await?;
        self.session = Some(session);
        Ok(())
    }

    pub async fn refresh(&self, url: &str) -> Result<()> {
        let session = self.session.as_ref().ok_or_else(|| {
            anyhow::anyhow!("window for display {} is not launched", self.display.id)
        })?;

        log::info!(
            "{} Refreshing display {} with {}",
            LOG_TAG_BROWSER,
            self.display.id,
            url
        );
        session.navigate_to(url).await
    }

    pub async fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(mut session) => {
                log::info!("{} Closing kiosk on display {}", LOG_TAG_BROWSER, self.display.id);
                session.close().await
            }
            None => Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{BrowserCall, RecordingBrowserLauncher};
    use super::*;

    fn create_window() -> KioskWindow {
        KioskWindow::for_display(
            Display::at_geometry(2, 3840, 0, 1920, 1080),
            "http://localhost:80",
        )
    }

    #[test]
    fn test_default_url_points_at_default_page_for_display() {
        let window = create_window();

        assert_eq!(
            window.default_url(),
            "http://localhost:80/default.html?displayId=2"
        );
        assert!(!window.is_launched());
    }

    #[tokio::test]
    async fn test_launch_without_url_opens_default_page() {
        let launcher = RecordingBrowserLauncher::default();
        let mut window = create_window();

        window.launch(&launcher, None).await.unwrap();

        assert!(window.is_launched());
        assert_eq!(
            launcher.recorded_calls(),
            vec![BrowserCall::Launch(
                2,
                "http://localhost:80/default.html?displayId=2".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_launch_with_url_opens_that_url() {
        let launcher = RecordingBrowserLauncher::default();
        let mut window = create_window();

        window
            .launch(&launcher, Some("http://localhost:80/kiosk.html?file=x.png"))
            .await
            .unwrap();

        assert_eq!(
            launcher.recorded_calls(),
            vec![BrowserCall::Launch(
                2,
                "http://localhost:80/kiosk.html?file=x.png".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_launch_twice_is_rejected() {
        let launcher = RecordingBrowserLauncher::default();
        let mut window = create_window();

        window.launch(&launcher, None).await.unwrap();
        let second_launch = window.launch(&launcher, None).await;

        assert!(second_launch.is_err());
        assert_eq!(launcher.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_before_launch_returns_error() {
        let window = create_window();

        let result = window.refresh("http://localhost:80/kiosk.html").await;

        assert!(result.unwrap_err().to_string().contains("not launched"));
    }

    #[tokio::test]
    async fn test_refresh_after_launch_navigates_session() {
        let launcher = RecordingBrowserLauncher::default();
        let mut window = create_window();
        window.launch(&launcher, None).await.unwrap();

        window.refresh("http://localhost:80/kiosk.html?file=a.gif").await.unwrap();

        assert_eq!(
            launcher.recorded_calls().last(),
            Some(&BrowserCall::Navigate(
                2,
                "http://localhost:80/kiosk.html?file=a.gif".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_close_returns_window_to_unlaunched() {
        let launcher = RecordingBrowserLauncher::default();
        let mut window = create_window();
        window.launch(&launcher, None).await.unwrap();

        window.close().await.unwrap();

        assert!(!window.is_launched());
        assert_eq!(launcher.recorded_calls().last(), Some(&BrowserCall::Close(2)));
    }
}
