use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::Display;

/// Starts a full-screen browser pinned to a display.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch_kiosk_session(
        &self,
        display: &Display,
        url: &str,
    ) -> Result<Box<dyn KioskSession>>;
}

/// Handle to a running kiosk browser. Dropping it must not leave the browser running.
#[async_trait]
pub trait KioskSession: Send + Sync {
    async fn navigate_to(&self, url: &str) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}
