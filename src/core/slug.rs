// src/core/slug.rs

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// Derives the shareable identifier for an audit of `url`.
///
/// The slug is the hostname (leading `www.` stripped) with every
/// non-alphanumeric character collapsed to `-`, lowercased, plus a base-36
/// millisecond timestamp suffix. A URL that fails to parse falls back to
/// `audit-<millis>`. Always non-empty; uniqueness holds per
/// target+millisecond pairing, which is enough for one-request-at-a-time
/// usage.
pub fn generate_slug(url: &str) -> String {
    slug_at(url, Utc::now().timestamp_millis())
}

/// Timestamp-explicit variant backing [`generate_slug`].
pub fn slug_at(url: &str, epoch_millis: i64) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned));
    match host {
        Some(host) => {
            let host = host.strip_prefix("www.").unwrap_or(&host);
            let sanitized = RE_NON_ALNUM.replace_all(host, "-").to_lowercase();
            format!("{}-{}", sanitized, base36(epoch_millis))
        }
        None => format!("audit-{}", epoch_millis),
    }
}

/// Lowercase base-36 rendering of a millisecond timestamp.
fn base36(millis: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = millis.max(0) as u64;
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}
