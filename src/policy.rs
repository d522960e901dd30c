//! Request override policy
//!
//! Decides, per intercepted outgoing request, whether and how to modify
//! it. Only the top-level navigation request may be rewritten; every
//! sub-resource request (images, scripts, stylesheets, XHR) must be
//! forwarded untouched. The decision is pure so the interception wiring
//! stays a thin loop: build an [`InterceptedRequest`] view from the CDP
//! event, ask the policy, resolve the request exactly once.

use crate::options::NavigationOptions;
use std::collections::HashMap;
use url::Url;

/// Content type assumed for a request body when none is supplied.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transient view of one outgoing HTTP request during navigation.
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    /// Request URL as reported by the engine.
    pub url: String,
    /// Request method as reported by the engine.
    pub method: String,
    /// Request headers as reported by the engine (name, value).
    pub headers: Vec<(String, String)>,
}

/// How to resolve an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAction {
    /// Forward unchanged.
    Continue,
    /// Continue the main request with overrides applied.
    Override {
        /// Method override, normalized to uppercase.
        method: Option<String>,
        /// Body override.
        body: Option<String>,
    },
}

/// Per-run override policy, derived from the options bundle.
#[derive(Debug, Clone)]
pub struct RequestOverridePolicy {
    target: Url,
    method: Option<String>,
    body: Option<String>,
}

impl RequestOverridePolicy {
    /// Derive the policy from the options bundle.
    pub fn from_options(options: &NavigationOptions) -> Self {
        Self {
            target: options.url.clone(),
            method: options.method.clone(),
            body: options.body.clone(),
        }
    }

    /// The navigation URL whose request may be rewritten.
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Interception is only worth enabling when something gets rewritten;
    /// otherwise requests are merely observed for echo output.
    pub fn interception_required(&self) -> bool {
        self.method.is_some() || self.body.is_some()
    }

    /// True when `url` is the main navigation request.
    pub fn is_main_request(&self, url: &str) -> bool {
        url == self.target.as_str()
    }

    /// Decide how to resolve one intercepted request.
    pub fn decide(&self, request: &InterceptedRequest) -> RequestAction {
        if !self.is_main_request(&request.url) {
            return RequestAction::Continue;
        }

        let method = self.method.as_deref().map(str::to_uppercase);
        let body = self.body.clone();

        if method.is_none() && body.is_none() {
            RequestAction::Continue
        } else {
            RequestAction::Override { method, body }
        }
    }

    /// The method that actually goes on the wire for the main request.
    pub fn effective_method(&self, request: &InterceptedRequest) -> String {
        match self.decide(request) {
            RequestAction::Override {
                method: Some(method),
                ..
            } => method,
            _ => request.method.clone(),
        }
    }
}

/// Merge the page-level extra headers for this run.
///
/// Precedence, later wins: base `{}` < referer < user-supplied headers.
/// When a body override is configured and the merged map names no content
/// type (both case-preserving spellings are checked), the form-urlencoded
/// default is added so the override actually reaches the wire.
pub fn effective_headers(options: &NavigationOptions) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    if let Some(referer) = &options.referer {
        headers.insert("referer".to_string(), referer.clone());
    }

    for (name, value) in &options.headers {
        headers.insert(name.clone(), value.clone());
    }

    if options.body.is_some()
        && !headers.contains_key("content-type")
        && !headers.contains_key("Content-Type")
    {
        headers.insert("content-type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
    }

    headers
}
