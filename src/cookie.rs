//! Cookie string parsing
//!
//! Turns raw `Name=Value; attr=...` strings, as passed with `-b/--cookie`,
//! into structured records ready for injection into the browser session.
//!
//! The grammar is deliberately small: the name runs to the first `=`, the
//! value to the first `;`, and the remainder is scanned for the attribute
//! keywords `Path`, `Domain`, `Secure`, `HttpOnly`, `Samesite` and
//! `Expires` (case-sensitive, order-independent). A cookie without an
//! explicit `Domain` is scoped to the target page URL so the engine only
//! applies it to that origin; a cookie without `Expires` is a session
//! cookie.

use crate::error::CookieParseError;

/// Where a cookie applies.
///
/// `Domain` and URL scoping are mutually exclusive; the variant makes the
/// invalid "both" state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieScope {
    /// No explicit domain given: scope to the navigation URL.
    TargetUrl,
    /// Explicit `Domain=` attribute.
    Domain(String),
}

/// When a cookie expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieExpiry {
    /// Cleared at the end of the browsing session.
    Session,
    /// Fixed expiry, seconds since the Unix epoch.
    At(u64),
}

/// `SameSite` attribute values accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// `Samesite=Lax`
    Lax,
    /// `Samesite=Strict`
    Strict,
}

/// One parsed cookie record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name (non-empty).
    pub name: String,
    /// Cookie value, possibly empty.
    pub value: String,
    /// Domain or target-URL scoping.
    pub scope: CookieScope,
    /// `Path=` attribute.
    pub path: Option<String>,
    /// `Secure` flag.
    pub secure: bool,
    /// `HttpOnly` flag.
    pub http_only: bool,
    /// `Samesite=` attribute.
    pub same_site: Option<SameSite>,
    /// Session cookie or fixed expiry.
    pub expiry: CookieExpiry,
}

impl Cookie {
    /// Parse a single raw cookie string.
    pub fn parse(raw: &str) -> Result<Self, CookieParseError> {
        let (name, after) = raw
            .split_once('=')
            .ok_or_else(|| CookieParseError::MissingSeparator(raw.to_string()))?;

        if name.is_empty() {
            return Err(CookieParseError::EmptyName(raw.to_string()));
        }

        let (value, rest) = match after.find(';') {
            Some(i) => (&after[..i], &after[i..]),
            None => (after, ""),
        };

        let scope = match attr_value(rest, "; Domain=") {
            Some(domain) => CookieScope::Domain(domain.to_string()),
            None => CookieScope::TargetUrl,
        };

        let expiry = match attr_value(rest, "; Expires=").and_then(leading_digits) {
            Some(secs) => CookieExpiry::At(secs),
            None => CookieExpiry::Session,
        };

        let same_site = attr_value(rest, "; Samesite=").and_then(|v| {
            if v.starts_with("Lax") {
                Some(SameSite::Lax)
            } else if v.starts_with("Strict") {
                Some(SameSite::Strict)
            } else {
                None
            }
        });

        Ok(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            scope,
            path: attr_value(rest, "; Path=").map(str::to_string),
            secure: rest.contains("; Secure"),
            http_only: rest.contains("; HttpOnly"),
            same_site,
            expiry,
        })
    }

    /// Parse each raw string into its own record, in input order.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, CookieParseError> {
        raw.iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    /// True when the cookie has no fixed expiry.
    pub fn is_session(&self) -> bool {
        self.expiry == CookieExpiry::Session
    }
}

/// Value of `<key>` in `rest`, running to the next `;` or end of string.
fn attr_value<'a>(rest: &'a str, key: &str) -> Option<&'a str> {
    let start = rest.find(key)? + key.len();
    let tail = &rest[start..];
    let value = match tail.find(';') {
        Some(end) => &tail[..end],
        None => tail,
    };
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse the leading decimal digits of `s`, if any.
fn leading_digits(s: &str) -> Option<u64> {
    let digits: &str = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return None,
        Some(end) => &s[..end],
        None => s,
    };
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_value_is_session_cookie() {
        let cookie = Cookie::parse("token=abc123").unwrap();
        assert_eq!(cookie.name, "token");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.scope, CookieScope::TargetUrl);
        assert_eq!(cookie.expiry, CookieExpiry::Session);
        assert!(!cookie.secure);
        assert!(!cookie.http_only);
        assert!(cookie.path.is_none());
        assert!(cookie.same_site.is_none());
    }

    #[test]
    fn test_domain_attribute_switches_scope() {
        let cookie = Cookie::parse("id=1; Domain=example.com").unwrap();
        assert_eq!(cookie.scope, CookieScope::Domain("example.com".to_string()));
    }

    #[test]
    fn test_absent_domain_scopes_to_target_url() {
        let cookie = Cookie::parse("id=1; Path=/app").unwrap();
        assert_eq!(cookie.scope, CookieScope::TargetUrl);
        assert_eq!(cookie.path.as_deref(), Some("/app"));
    }

    #[test]
    fn test_expires_attribute() {
        let cookie = Cookie::parse("id=1; Expires=1735689600").unwrap();
        assert_eq!(cookie.expiry, CookieExpiry::At(1735689600));
        assert!(!cookie.is_session());
    }

    #[test]
    fn test_non_numeric_expires_falls_back_to_session() {
        let cookie = Cookie::parse("id=1; Expires=tomorrow").unwrap();
        assert_eq!(cookie.expiry, CookieExpiry::Session);
    }

    #[test]
    fn test_boolean_attributes() {
        let cookie = Cookie::parse("id=1; Secure; HttpOnly").unwrap();
        assert!(cookie.secure);
        assert!(cookie.http_only);
    }

    #[test]
    fn test_samesite_values() {
        let lax = Cookie::parse("id=1; Samesite=Lax").unwrap();
        assert_eq!(lax.same_site, Some(SameSite::Lax));

        let strict = Cookie::parse("id=1; Samesite=Strict").unwrap();
        assert_eq!(strict.same_site, Some(SameSite::Strict));

        // keyword matching is case-sensitive, as documented
        let lower = Cookie::parse("id=1; samesite=lax").unwrap();
        assert_eq!(lower.same_site, None);
    }

    #[test]
    fn test_attributes_are_order_independent() {
        let cookie =
            Cookie::parse("sid=xyz; HttpOnly; Expires=99; Domain=a.example; Path=/; Secure")
                .unwrap();
        assert_eq!(cookie.scope, CookieScope::Domain("a.example".to_string()));
        assert_eq!(cookie.expiry, CookieExpiry::At(99));
        assert_eq!(cookie.path.as_deref(), Some("/"));
        assert!(cookie.secure);
        assert!(cookie.http_only);
    }

    #[test]
    fn test_value_stops_at_first_semicolon() {
        let cookie = Cookie::parse("k=a=b; Path=/x").unwrap();
        assert_eq!(cookie.value, "a=b");
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let cookie = Cookie::parse("flag=").unwrap();
        assert_eq!(cookie.value, "");
        assert_eq!(cookie.expiry, CookieExpiry::Session);
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        let err = Cookie::parse("not-a-cookie").unwrap_err();
        assert!(matches!(err, CookieParseError::MissingSeparator(_)));
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let err = Cookie::parse("=value").unwrap_err();
        assert!(matches!(err, CookieParseError::EmptyName(_)));
    }

    #[test]
    fn test_parse_all_keeps_every_record() {
        let raw = ["a=1", "b=2; Domain=example.org", "c=3; Expires=5"];
        let cookies = Cookie::parse_all(&raw).unwrap();
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies[0].name, "a");
        assert_eq!(
            cookies[1].scope,
            CookieScope::Domain("example.org".to_string())
        );
        assert_eq!(cookies[2].expiry, CookieExpiry::At(5));
    }

    #[test]
    fn test_parse_all_propagates_first_error() {
        let raw = ["a=1", "broken"];
        assert!(Cookie::parse_all(&raw).is_err());
    }
}
