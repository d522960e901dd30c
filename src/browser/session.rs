//! Browser session lifecycle
//!
//! Launch and shutdown of the headless Chromium instance. The CDP event
//! handler returned by `Browser::launch` is drained on a spawned task for
//! the lifetime of the session.

use crate::error::{BrowserError, Error, Result};
use crate::options::Viewport;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// One launched browser, good for a single navigation run.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a headless browser. Failure here is fatal; there is no
    /// retry.
    #[instrument]
    pub async fn launch(viewport: Option<Viewport>) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        if let Some(v) = viewport {
            builder = builder.viewport(chromiumoxide::handler::viewport::Viewport {
                width: v.width,
                height: v.height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            });
        }

        let config = builder
            .build()
            .map_err(|e| BrowserError::ConfigError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        info!("Browser launched");

        Ok(Self {
            browser,
            handler: handler_task,
        })
    }

    /// Open a blank page in the session.
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()).into())
    }

    /// Close the browser and wait briefly for the handler to finish.
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let _ = tokio::time::timeout(Duration::from_secs(5), self.handler).await;

        debug!("Browser closed");
        Ok(())
    }
}
