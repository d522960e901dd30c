//! Navigation options
//!
//! The immutable option bundle for one run, built once before navigation
//! begins and treated as read-only for the duration of the run.

use crate::cookie::Cookie;
use crate::error::NavigationError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Page-lifecycle signal that marks navigation as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    /// Wait until the load event fires
    Load,
    /// Wait until DOMContentLoaded fires
    DomContentLoaded,
    /// Wait until the network is idle (0 connections for 500ms)
    #[default]
    NetworkIdle0,
    /// Wait until the network is nearly idle (at most 1 connection for 500ms)
    NetworkIdle1,
}

impl WaitUntil {
    /// The accepted command-line spellings.
    pub const VALUES: [&'static str; 4] =
        ["load", "domcontentloaded", "networkidle0", "networkidle1"];

    /// Command-line spelling of this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle0 => "networkidle0",
            WaitUntil::NetworkIdle1 => "networkidle1",
        }
    }
}

impl FromStr for WaitUntil {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "load" => Ok(WaitUntil::Load),
            "domcontentloaded" => Ok(WaitUntil::DomContentLoaded),
            "networkidle0" => Ok(WaitUntil::NetworkIdle0),
            "networkidle1" => Ok(WaitUntil::NetworkIdle1),
            _ => Err(format!(
                "--waituntil can only be one of: {}",
                Self::VALUES.join(", ")
            )),
        }
    }
}

/// Browser viewport dimensions, parsed from `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in CSS pixels, 1..=7680
    pub width: u32,
    /// Height in CSS pixels, 1..=4320
    pub height: u32,
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or_else(|| {
            "viewport must be in format WIDTHxHEIGHT (e.g., 1920x1080)".to_string()
        })?;
        let width: u32 = w
            .parse()
            .map_err(|_| "viewport must be in format WIDTHxHEIGHT (e.g., 1920x1080)".to_string())?;
        let height: u32 = h
            .parse()
            .map_err(|_| "viewport must be in format WIDTHxHEIGHT (e.g., 1920x1080)".to_string())?;

        if width < 1 || height < 1 || width > 7680 || height > 4320 {
            return Err(
                "viewport dimensions must be between 1-7680 (width) and 1-4320 (height)"
                    .to_string(),
            );
        }

        Ok(Viewport { width, height })
    }
}

/// Immutable option bundle for one navigation.
#[derive(Debug, Clone)]
pub struct NavigationOptions {
    /// Parsed absolute target URL.
    pub url: Url,
    /// HTTP method override; `None` leaves the engine's GET untouched.
    pub method: Option<String>,
    /// Request body override.
    pub body: Option<String>,
    /// Referer header value (validated absolute URL).
    pub referer: Option<String>,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Extra headers, name unique, last write wins.
    pub headers: HashMap<String, String>,
    /// Cookies to inject, in input order.
    pub cookies: Vec<Cookie>,
    /// Navigation completion signal.
    pub wait_until: WaitUntil,
    /// Max navigation time in milliseconds.
    pub max_time_ms: u64,
    /// Performance trace output path.
    pub trace_path: Option<PathBuf>,
    /// Echo the outgoing main request (method, host, headers).
    pub echo_request_headers: bool,
    /// Echo the main response status and headers.
    pub echo_response_headers: bool,
    /// Viewport override.
    pub viewport: Option<Viewport>,
}

impl NavigationOptions {
    /// Start building options for the given target URL.
    pub fn builder<S: Into<String>>(url: S) -> NavigationOptionsBuilder {
        NavigationOptionsBuilder::new(url)
    }
}

/// Builder for [`NavigationOptions`].
///
/// URL parsing is deferred to [`build`](Self::build) so an invalid target
/// surfaces as a single error at construction time.
#[derive(Debug)]
pub struct NavigationOptionsBuilder {
    url: String,
    method: Option<String>,
    body: Option<String>,
    referer: Option<String>,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
    cookies: Vec<Cookie>,
    wait_until: WaitUntil,
    max_time_ms: u64,
    trace_path: Option<PathBuf>,
    echo_request_headers: bool,
    echo_response_headers: bool,
    viewport: Option<Viewport>,
}

impl NavigationOptionsBuilder {
    fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            method: None,
            body: None,
            referer: None,
            user_agent: None,
            headers: HashMap::new(),
            cookies: Vec::new(),
            wait_until: WaitUntil::default(),
            max_time_ms: 30_000,
            trace_path: None,
            echo_request_headers: false,
            echo_response_headers: false,
            viewport: None,
        }
    }

    /// Set the HTTP method override.
    pub fn method<S: Into<String>>(mut self, method: S) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the request body override.
    pub fn body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the referer (an already-validated absolute URL string).
    pub fn referer<S: Into<String>>(mut self, referer: S) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set the user agent override.
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the extra header map.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the cookies to inject.
    pub fn cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    /// Set the wait condition.
    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    /// Set the max navigation time in milliseconds.
    pub fn max_time_ms(mut self, ms: u64) -> Self {
        self.max_time_ms = ms;
        self
    }

    /// Write a performance trace to the given path.
    pub fn trace_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.trace_path = Some(path.into());
        self
    }

    /// Echo request and response headers (the `-v` behavior).
    pub fn echo_headers(mut self, echo: bool) -> Self {
        self.echo_request_headers = echo;
        self.echo_response_headers = echo;
        self
    }

    /// Set the viewport.
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Validate the target URL and freeze the bundle.
    pub fn build(self) -> Result<NavigationOptions, NavigationError> {
        let url = Url::parse(&self.url).map_err(|e| {
            NavigationError::InvalidUrl(format!("{}: {e}", self.url))
        })?;

        Ok(NavigationOptions {
            url,
            method: self.method,
            body: self.body,
            referer: self.referer,
            user_agent: self.user_agent,
            headers: self.headers,
            cookies: self.cookies,
            wait_until: self.wait_until,
            max_time_ms: self.max_time_ms,
            trace_path: self.trace_path,
            echo_request_headers: self.echo_request_headers,
            echo_response_headers: self.echo_response_headers,
            viewport: self.viewport,
        })
    }
}
