//! Navigation driver
//!
//! Orchestrates one run: launch, configure the page (user agent,
//! interception or observation, cookies, merged extra headers, tracing),
//! navigate with a single overall timeout, then extract and emit the
//! rendered DOM. Every failure is terminal for the run; nothing is
//! retried.

use crate::browser::intercept;
use crate::browser::session::BrowserSession;
use crate::browser::trace::TraceRecorder;
use crate::cookie::{CookieExpiry, CookieScope, SameSite};
use crate::error::{BrowserError, Error, NavigationError, Result};
use crate::options::{NavigationOptions, WaitUntil};
use crate::output::Sink;
use crate::policy::{self, RequestOverridePolicy};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, CookieSameSite, Headers, SetCookiesParams, SetExtraHttpHeadersParams,
    SetUserAgentOverrideParams, TimeSinceEpoch,
};
use chromiumoxide::Page;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Drives a single navigation from options to emitted DOM.
pub struct NavigationDriver {
    options: NavigationOptions,
    out: Sink,
}

impl NavigationDriver {
    /// Build a driver around a frozen options bundle and an output sink.
    pub fn new(options: NavigationOptions, out: Sink) -> Self {
        Self { options, out }
    }

    /// Run the full pipeline. The browser is closed on both the success
    /// and the failure path.
    #[instrument(skip(self), fields(url = %self.options.url))]
    pub async fn run(&self) -> Result<()> {
        let session = BrowserSession::launch(self.options.viewport).await?;

        let outcome = self.navigate(&session).await;

        if let Err(e) = session.close().await {
            debug!("browser close failed: {e}");
        }

        outcome
    }

    async fn navigate(&self, session: &BrowserSession) -> Result<()> {
        let page = session.new_page().await?;

        if let Some(ua) = &self.options.user_agent {
            page.execute(SetUserAgentOverrideParams::new(ua.clone()))
                .await?;
        }

        let policy = RequestOverridePolicy::from_options(&self.options);
        let echo = self
            .options
            .echo_request_headers
            .then(|| self.out.clone());

        let request_task = if policy.interception_required() {
            intercept::install_interceptor(&page, policy.clone(), echo).await?
        } else {
            intercept::install_observer(&page, policy.clone(), echo).await?
        };

        self.inject_cookies(&page).await?;

        let headers = policy::effective_headers(&self.options);
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::to_value(&headers)?,
        )))
        .await?;

        let trace = match &self.options.trace_path {
            Some(path) => Some(TraceRecorder::start(&page, path.clone()).await?),
            None => None,
        };

        let (response_task, response_slot) =
            intercept::watch_main_response(&page, self.options.url.clone()).await?;

        info!("Navigating to {}", self.options.url);

        let navigation = async {
            page.goto(self.options.url.as_str())
                .await
                .map_err(|e| Error::from(NavigationError::LoadFailed(e.to_string())))?;
            self.wait_for_ready(&page).await
        };

        tokio::time::timeout(Duration::from_millis(self.options.max_time_ms), navigation)
            .await
            .map_err(|_| NavigationError::Timeout(self.options.max_time_ms))??;

        // Stop tracing before the final output read so the trace file is
        // fully flushed by the time the DOM appears.
        if let Some(trace) = trace {
            trace.stop(&page).await?;
        }

        if self.options.echo_response_headers {
            let response = response_slot.lock().take();
            if let Some(response) = response {
                self.out.write_line(&format!("< HTTP {}", response.status))?;
                for (name, value) in &response.headers {
                    self.out.write_line(&format!("< {name}: {value}"))?;
                }
            }
        }

        let html = page
            .content()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;
        self.out.write_line(&html)?;
        self.out.flush()?;

        request_task.abort();
        response_task.abort();

        Ok(())
    }

    /// Inject all cookies in input order; any rejection is fatal.
    async fn inject_cookies(&self, page: &Page) -> Result<()> {
        if self.options.cookies.is_empty() {
            return Ok(());
        }

        let mut params = Vec::with_capacity(self.options.cookies.len());
        for cookie in &self.options.cookies {
            let mut builder = CookieParam::builder()
                .name(&cookie.name)
                .value(&cookie.value)
                .secure(cookie.secure)
                .http_only(cookie.http_only);

            builder = match &cookie.scope {
                CookieScope::Domain(domain) => builder.domain(domain.clone()),
                CookieScope::TargetUrl => builder.url(self.options.url.to_string()),
            };

            if let Some(path) = &cookie.path {
                builder = builder.path(path.clone());
            }

            if let Some(same_site) = cookie.same_site {
                builder = builder.same_site(match same_site {
                    SameSite::Lax => CookieSameSite::Lax,
                    SameSite::Strict => CookieSameSite::Strict,
                });
            }

            if let CookieExpiry::At(secs) = cookie.expiry {
                builder = builder.expires(TimeSinceEpoch::new(secs as f64));
            }

            params.push(builder.build().map_err(|e| BrowserError::CookieRejected {
                name: cookie.name.clone(),
                reason: e.to_string(),
            })?);
        }

        page.execute(SetCookiesParams::new(params))
            .await
            .map_err(|e| BrowserError::CookieRejected {
                name: self.options.cookies[0].name.clone(),
                reason: e.to_string(),
            })?;

        debug!("Injected {} cookie(s)", self.options.cookies.len());
        Ok(())
    }

    /// Settle the configured wait condition after the engine's own load
    /// handling.
    async fn wait_for_ready(&self, page: &Page) -> Result<()> {
        let script = match self.options.wait_until {
            WaitUntil::Load => {
                r#"
                    new Promise(resolve => {
                        if (document.readyState === 'complete') {
                            resolve(true);
                        } else {
                            window.addEventListener('load', () => resolve(true));
                        }
                    })
                "#
            }
            WaitUntil::DomContentLoaded => {
                r#"
                    new Promise(resolve => {
                        if (document.readyState !== 'loading') {
                            resolve(true);
                        } else {
                            document.addEventListener('DOMContentLoaded', () => resolve(true));
                        }
                    })
                "#
            }
            WaitUntil::NetworkIdle0 | WaitUntil::NetworkIdle1 => {
                // Both idle variants settle as load plus a quiet window.
                r#"
                    new Promise(resolve => {
                        if (document.readyState === 'complete') {
                            setTimeout(() => resolve(true), 500);
                        } else {
                            window.addEventListener('load', () => {
                                setTimeout(() => resolve(true), 500);
                            });
                        }
                    })
                "#
            }
        };

        page.evaluate(script)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}
