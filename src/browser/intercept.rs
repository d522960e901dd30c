//! Request interception and observation
//!
//! Two modes, chosen by the override policy. When a method or body
//! override is configured, the Fetch domain pauses every outgoing request
//! and each one is resolved here exactly once: sub-resources continue
//! untouched, the main request continues with overrides. When nothing is
//! rewritten, requests are only observed through `Network.requestWillBeSent`
//! for the verbose echo, avoiding the pause/resume overhead entirely.
//!
//! A paused request that is never resolved stalls the whole page load, so
//! the interception loop answers every event, including the ones it does
//! not care about.

use crate::error::Result;
use crate::output::Sink;
use crate::policy::{InterceptedRequest, RequestAction, RequestOverridePolicy};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{
    EventRequestWillBeSent, EventResponseReceived, Headers,
};
use chromiumoxide::Page;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

/// Status and headers of the main document response.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    /// HTTP status code.
    pub status: i64,
    /// Response headers in engine order.
    pub headers: Vec<(String, String)>,
}

/// Enable Fetch-domain interception and resolve every paused request.
pub async fn install_interceptor(
    page: &Page,
    policy: RequestOverridePolicy,
    echo: Option<Sink>,
) -> Result<JoinHandle<()>> {
    let pattern = RequestPattern::builder()
        .url_pattern("*")
        .request_stage(RequestStage::Request)
        .build();
    page.execute(fetch::EnableParams::builder().pattern(pattern).build())
        .await?;

    let mut events = page.event_listener::<EventRequestPaused>().await?;
    let page = page.clone();

    Ok(tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let request = InterceptedRequest {
                url: event.request.url.clone(),
                method: event.request.method.clone(),
                headers: header_pairs(&event.request.headers),
            };

            let action = policy.decide(&request);

            if let Some(sink) = &echo {
                if policy.is_main_request(&request.url) {
                    echo_request(sink, policy.target(), &policy.effective_method(&request), &request.headers);
                }
            }

            let mut params = ContinueRequestParams::new(event.request_id.clone());
            if let RequestAction::Override { method, body } = action {
                params.method = method;
                params.post_data = body.map(|b| BASE64.encode(b.as_bytes()).into());
            }

            if let Err(e) = page.execute(params).await {
                debug!("continueRequest failed: {e}");
            }
        }
    }))
}

/// Observe outgoing requests without pausing them.
pub async fn install_observer(
    page: &Page,
    policy: RequestOverridePolicy,
    echo: Option<Sink>,
) -> Result<JoinHandle<()>> {
    let mut events = page.event_listener::<EventRequestWillBeSent>().await?;

    Ok(tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if let Some(sink) = &echo {
                if policy.is_main_request(&event.request.url) {
                    let headers = header_pairs(&event.request.headers);
                    echo_request(sink, policy.target(), &event.request.method, &headers);
                }
            }
        }
    }))
}

/// Capture status and headers of the main document response.
pub async fn watch_main_response(
    page: &Page,
    target: Url,
) -> Result<(JoinHandle<()>, Arc<Mutex<Option<ResponseInfo>>>)> {
    let slot: Arc<Mutex<Option<ResponseInfo>>> = Arc::new(Mutex::new(None));
    let mut events = page.event_listener::<EventResponseReceived>().await?;

    let out = slot.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if event.response.url == target.as_str() && out.lock().is_none() {
                *out.lock() = Some(ResponseInfo {
                    status: event.response.status,
                    headers: header_pairs(&event.response.headers),
                });
            }
        }
    });

    Ok((task, slot))
}

/// Print the outgoing main request, curl-style, before it is resolved.
fn echo_request(sink: &Sink, target: &Url, method: &str, headers: &[(String, String)]) {
    let host = match target.port() {
        Some(port) => format!("{}:{port}", target.host_str().unwrap_or_default()),
        None => target.host_str().unwrap_or_default().to_string(),
    };

    let _ = sink.write_line(&format!("> {method} {} ", target.path()));
    let _ = sink.write_line(&format!("> Host: {host}"));
    for (name, value) in headers {
        let _ = sink.write_line(&format!("> {name}: {value}"));
    }
}

/// Flatten a CDP header object into (name, value) pairs.
fn header_pairs(headers: &Headers) -> Vec<(String, String)> {
    headers
        .inner()
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, value)| {
                    let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                    (name.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_pairs_from_object() {
        let headers = Headers::new(json!({
            "accept": "text/html",
            "x-count": 3,
        }));
        let mut pairs = header_pairs(&headers);
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("accept".to_string(), "text/html".to_string()),
                ("x-count".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_pairs_from_non_object() {
        let headers = Headers::new(json!(null));
        assert!(header_pairs(&headers).is_empty());
    }
}
