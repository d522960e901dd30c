//! Header map building
//!
//! Turns raw `Name: Value` strings from repeated `-H/--header` flags into
//! a name→value map. The split happens at the *first* colon and the value
//! is kept verbatim, leading whitespace included; names are not case
//! normalized. Later entries overwrite earlier ones with the same name.

use std::collections::HashMap;

/// Build a header map from raw `Name:Value` entries.
///
/// An entry without a colon degrades to an empty-string name carrying the
/// whole entry as its value; callers that care can reject such input
/// before it reaches the wire.
pub fn header_map<S: AsRef<str>>(entries: &[S]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.as_ref();
        let (name, value) = match entry.split_once(':') {
            Some((name, value)) => (name, value),
            None => ("", entry),
        };
        map.insert(name.to_string(), value.to_string());
    }
    map
}
