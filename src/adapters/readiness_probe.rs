use anyhow::Result;
use std::time::Duration;

use crate::global_constants::LOG_TAG_READINESS;

/// Polls a URL at a fixed interval until it answers with a success status,
/// giving up once `timeout` has elapsed.
pub struct HttpReadinessProbe {
    client: reqwest::Client,
    poll_interval: Duration,
    timeout: Duration,
}

impl HttpReadinessProbe {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            poll_interval,
            timeout,
        }
    }

    pub async fn wait_until_ready(&self, url: &str) -> Result<()> {
        log::info!("{} waiting for {}", LOG_TAG_READINESS, url);

        match tokio::time::timeout(self.timeout, self.poll_until_success(url)).await {
            Ok(()) => {
                log::info!("{} {} is ready", LOG_TAG_READINESS, url);
                Ok(())
            }
            Err(_) => anyhow::bail!(
                "{} did not become ready within {:?}",
                url,
                self.timeout
            ),
        }
    }

    async fn poll_until_success(&self, url: &str) {
        loop {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => return,
                Ok(response) => {
                    log::debug!(
                        "{} {} answered {}, retrying",
                        LOG_TAG_READINESS,
                        url,
                        response.status()
                    );
                }
                Err(e) => {
                    log::debug!("{} {} not reachable yet: {}", LOG_TAG_READINESS, url, e);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
