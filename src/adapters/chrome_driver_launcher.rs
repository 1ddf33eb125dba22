use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

use crate::adapters::HttpReadinessProbe;
use crate::core::interfaces::ports::{BrowserLauncher, KioskSession};
use crate::core::models::Display;
use crate::global_constants::{
    CHROMEDRIVER_LAUNCH_ATTEMPTS, CHROMEDRIVER_POLL_INTERVAL_MILLIS,
    CHROMEDRIVER_STARTUP_TIMEOUT_SECONDS, LOG_TAG_BROWSER,
};

/// Drives Chrome/Chromium through a private chromedriver process per window,
/// speaking the W3C WebDriver protocol over HTTP.
///
/// Every WebDriver request is bounded by `command_timeout`, so a hung driver
/// cannot hold a display's window lock forever.
pub struct ChromeDriverLauncher {
    chromedriver_path: String,
    browser_binary_path: Option<String>,
    client: reqwest::Client,
}

impl ChromeDriverLauncher {
    pub fn new(
        chromedriver_path: String,
        browser_binary_path: Option<String>,
        command_timeout: Duration,
    ) -> Result<Self> {
        log::debug!(
            "{} chromedriver={}, browser={:?}, command timeout={:?}",
            LOG_TAG_BROWSER,
            chromedriver_path,
            browser_binary_path,
            command_timeout
        );

        let client = reqwest::Client::builder()
            .timeout(command_timeout)
            .build()
            .context("failed to build the WebDriver HTTP client")?;

        Ok(Self {
            chromedriver_path,
            browser_binary_path,
            client,
        })
    }

    fn build_session_capabilities(&self, display: &Display) -> Value {
        let mut chrome_options = json!({
            "args": [
                "--kiosk",
                format!("--window-position={},{}", display.x_position, display.y_position),
                "--noerrdialogs",
                "--disable-infobars",
            ],
            "useAutomationExtension": false,
            "excludeSwitches": ["enable-automation"],
        });

        if let Some(binary_path) = &self.browser_binary_path {
            chrome_options["binary"] = json!(binary_path);
        }

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": chrome_options,
                }
            }
        })
    }

    fn reserve_local_port(&self) -> Result<u16> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")
            .context("failed to reserve a port for chromedriver")?;
        Ok(listener.local_addr()?.port())
    }

    async fn spawn_driver_process(&self, port: u16) -> Result<Child> {
        log::debug!(
            "{} starting {} on port {}",
            LOG_TAG_BROWSER,
            self.chromedriver_path,
            port
        );

        Command::new(&self.chromedriver_path)
            .arg(format!("--port={}", port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start chromedriver at {}", self.chromedriver_path))
    }

    async fn create_session(&self, driver_url: &str, display: &Display) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/session", driver_url))
            .json(&self.build_session_capabilities(display))
            .send()
            .await
            .context("chromedriver refused the session request")?;

        let value = read_webdriver_value(response).await?;
        extract_session_id(&value)
    }

    // The reserved port is free again before chromedriver binds it, so a
    // failed attempt starts over on a fresh port.
    async fn start_driver_session(&self, display: &Display) -> Result<ChromeDriverSession> {
        let port = self.reserve_local_port()?;
        let driver_process = self.spawn_driver_process(port).await?;
        let driver_url = format!("http://127.0.0.1:{}", port);

        HttpReadinessProbe::new(
            Duration::from_millis(CHROMEDRIVER_POLL_INTERVAL_MILLIS),
            Duration::from_secs(CHROMEDRIVER_STARTUP_TIMEOUT_SECONDS),
        )
        .wait_until_ready(&format!("{}/status", driver_url))
        .await?;

        let session_id = self.create_session(&driver_url, display).await?;

        Ok(ChromeDriverSession {
            client: self.client.clone(),
            driver_url,
            session_id,
            driver_process,
        })
    }
}

async fn retry_launch<T, F, Fut>(attempts: usize, mut attempt: F) -> Result<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt_number = 1;
    loop {
        match attempt(attempt_number).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt_number < attempts => {
                log::warn!(
                    "{} launch attempt {}/{} failed: {:#}, retrying",
                    LOG_TAG_BROWSER,
                    attempt_number,
                    attempts,
                    e
                );
                attempt_number += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeDriverLauncher {
    async fn launch_kiosk_session(
        &self,
        display: &Display,
        url: &str,
    ) -> Result<Box<dyn KioskSession>> {
        let session = retry_launch(CHROMEDRIVER_LAUNCH_ATTEMPTS, |_| {
            self.start_driver_session(display)
        })
        .await?;
        log::info!(
            "{} session {} opened for display {}",
            LOG_TAG_BROWSER,
            session.session_id,
            display.id
        );

        session.navigate_to(url).await?;

        Ok(Box::new(session))
    }
}

struct ChromeDriverSession {
    client: reqwest::Client,
    driver_url: String,
    session_id: String,
    driver_process: Child,
}

impl ChromeDriverSession {
    fn session_url(&self) -> String {
        format!("{}/session/{}", self.driver_url, self.session_id)
    }
}

#[async_trait]
impl KioskSession for ChromeDriverSession {
    async fn navigate_to(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/url", self.session_url()))
            .json(&json!({ "url": url }))
            .send()
            .await
            .with_context(|| format!("failed to reach chromedriver for session {}", self.session_id))?;

        read_webdriver_value(response).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let delete_result = self.client.delete(self.session_url()).send().await;
        if let Err(e) = &delete_result {
            log::warn!(
                "{} failed to delete session {}: {}",
                LOG_TAG_BROWSER,
                self.session_id,
                e
            );
        }

        self.driver_process
            .kill()
            .await
            .context("failed to stop chromedriver")
    }
}

async fn read_webdriver_value(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("chromedriver returned a non-JSON body")?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        anyhow::bail!("chromedriver error ({}): {}", status, describe_webdriver_error(&value));
    }

    Ok(value)
}

fn extract_session_id(value: &Value) -> Result<String> {
    value["sessionId"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("chromedriver response has no sessionId"))
}

fn describe_webdriver_error(value: &Value) -> String {
    let error = value["error"].as_str().unwrap_or("unknown error");
    match value["message"].as_str() {
        Some(message) => format!("{}: {}", error, message),
        None => error.to_string(),
    }
}
