//! Pipeline tests
//!
//! Exercise the option bundle, the parsers, and the override policy
//! together, the way the CLI wires them. Full end-to-end runs require a
//! Chrome/Chromium instance and live outside the unit suite.

use domcurl::cookie::{Cookie, CookieExpiry, CookieScope};
use domcurl::headers::header_map;
use domcurl::options::NavigationOptions;
use domcurl::policy::{
    effective_headers, InterceptedRequest, RequestAction, RequestOverridePolicy,
    DEFAULT_CONTENT_TYPE,
};
use pretty_assertions::assert_eq;

fn request(url: &str) -> InterceptedRequest {
    InterceptedRequest {
        url: url.to_string(),
        method: "GET".to_string(),
        headers: Vec::new(),
    }
}

#[test]
fn post_with_data_rewrites_only_the_main_request() {
    let options = NavigationOptions::builder("https://example.com/page")
        .method("post")
        .body("a=1&b=2")
        .build()
        .unwrap();
    let policy = RequestOverridePolicy::from_options(&options);

    assert!(policy.interception_required());

    // sub-resources pass through byte-identical
    for sub in [
        "https://cdn.example.com/style.css",
        "https://example.com/app.js",
        "https://example.com/page?cachebust=1",
    ] {
        assert_eq!(policy.decide(&request(sub)), RequestAction::Continue);
    }

    assert_eq!(
        policy.decide(&request("https://example.com/page")),
        RequestAction::Override {
            method: Some("POST".to_string()),
            body: Some("a=1&b=2".to_string()),
        }
    );
}

#[test]
fn data_without_content_type_gets_the_form_default() {
    let options = NavigationOptions::builder("https://example.com/")
        .body("a=1")
        .build()
        .unwrap();

    let merged = effective_headers(&options);
    assert_eq!(
        merged.get("content-type").map(String::as_str),
        Some(DEFAULT_CONTENT_TYPE)
    );
}

#[test]
fn explicit_content_type_header_wins_over_the_default() {
    let options = NavigationOptions::builder("https://example.com/")
        .body("{\"a\":1}")
        .headers(header_map(&["Content-Type: application/json"]))
        .build()
        .unwrap();

    let merged = effective_headers(&options);
    assert_eq!(
        merged.get("Content-Type").map(String::as_str),
        Some(" application/json")
    );
    assert!(!merged.contains_key("content-type"));
}

#[test]
fn referer_flows_into_the_merged_headers() {
    let options = NavigationOptions::builder("https://example.com/")
        .referer("https://news.example/feed")
        .build()
        .unwrap();

    let merged = effective_headers(&options);
    assert_eq!(
        merged.get("referer").map(String::as_str),
        Some("https://news.example/feed")
    );
}

#[test]
fn repeated_headers_keep_the_last_value_through_the_bundle() {
    let raw = vec![
        "X-Token: first".to_string(),
        "X-Token: second".to_string(),
        "Accept: text/html".to_string(),
    ];
    let options = NavigationOptions::builder("https://example.com/")
        .headers(header_map(&raw))
        .build()
        .unwrap();

    let merged = effective_headers(&options);
    assert_eq!(merged.get("X-Token").map(String::as_str), Some(" second"));
    assert_eq!(merged.get("Accept").map(String::as_str), Some(" text/html"));
}

#[test]
fn multiple_cookie_flags_all_reach_the_bundle() {
    let raw = vec![
        "session=abc".to_string(),
        "pref=dark; Domain=example.com; Path=/; Secure".to_string(),
        "seen=1; Expires=1735689600; HttpOnly".to_string(),
    ];
    let cookies = Cookie::parse_all(&raw).unwrap();
    let options = NavigationOptions::builder("https://example.com/")
        .cookies(cookies)
        .build()
        .unwrap();

    assert_eq!(options.cookies.len(), 3);

    assert_eq!(options.cookies[0].scope, CookieScope::TargetUrl);
    assert_eq!(options.cookies[0].expiry, CookieExpiry::Session);

    assert_eq!(
        options.cookies[1].scope,
        CookieScope::Domain("example.com".to_string())
    );
    assert!(options.cookies[1].secure);

    assert_eq!(options.cookies[2].expiry, CookieExpiry::At(1735689600));
    assert!(options.cookies[2].http_only);
}

#[test]
fn get_without_overrides_needs_no_interception() {
    let options = NavigationOptions::builder("https://example.com/")
        .user_agent("TestBot/1.0")
        .referer("https://from.example/")
        .build()
        .unwrap();
    let policy = RequestOverridePolicy::from_options(&options);

    assert!(!policy.interception_required());
}

#[test]
fn url_normalization_applies_to_the_main_request_match() {
    // "https://example.com" parses with a trailing slash; the engine
    // reports the same normalized form.
    let options = NavigationOptions::builder("https://example.com")
        .method("HEAD")
        .build()
        .unwrap();
    let policy = RequestOverridePolicy::from_options(&options);

    assert!(policy.is_main_request("https://example.com/"));
    assert!(!policy.is_main_request("https://example.com"));
}

#[test]
fn method_only_override_keeps_body_untouched() {
    let options = NavigationOptions::builder("https://example.com/")
        .method("delete")
        .build()
        .unwrap();
    let policy = RequestOverridePolicy::from_options(&options);

    match policy.decide(&request("https://example.com/")) {
        RequestAction::Override { method, body } => {
            assert_eq!(method.as_deref(), Some("DELETE"));
            assert_eq!(body, None);
        }
        other => panic!("expected override, got {other:?}"),
    }
}
