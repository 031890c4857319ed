// src/core/scanner/probe_client.rs

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

/// Fixed identifying user-agent sent with every request the auditor issues.
pub const SCANNER_USER_AGENT: &str = "Mozilla/5.0 (compatible; LanternRS-Auditor/0.1)";

/// Hard abort for the primary page fetch.
const PRIMARY_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard abort for each auxiliary well-known probe.
const AUXILIARY_TIMEOUT: Duration = Duration::from_secs(3);

/// Path fragments in robots.txt that hint at material an operator probably
/// did not mean to advertise.
const SENSITIVE_PATHS: &[&str] = &[
    "/admin", "/api", "/internal", "/backup", "/config", "/.env", "/private",
];

/// The primary fetch, reduced to what the check catalogue consumes: response
/// headers with lowercase names, and the body as text.
#[derive(Debug, Clone)]
pub struct PageProbe {
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Best-effort result of the security.txt probe. Never an error channel:
/// an unreachable or erroring endpoint reads as "not present".
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityTxtProbe {
    pub exists: bool,
}

/// Best-effort result of the robots.txt probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobotsTxtProbe {
    pub exists: bool,
    pub exposes_sensitive: bool,
}

/// Builds the HTTP client shared by the primary fetch and both auxiliary
/// probes. Redirects are followed with reqwest's default policy.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(SCANNER_USER_AGENT)
        .build()
}

/// Fetches the target page. This is the only fatal fetch of an audit: any
/// failure here (DNS, connect, TLS, timeout) propagates to the caller.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> reqwest::Result<PageProbe> {
    let response = client
        .get(url)
        .timeout(PRIMARY_TIMEOUT)
        .send()
        .await?;
    info!(status = %response.status(), "Received primary response.");

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        let value = match value.to_str() {
            Ok(s) => s.to_string(),
            Err(_) => {
                warn!(header_name = %name, "Header value contained invalid UTF-8.");
                "[Invalid UTF-8]".to_string()
            }
        };
        headers.insert(name.as_str().to_string(), value);
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), header_count = headers.len(), "Read primary response body.");
    Ok(PageProbe { headers, body })
}

/// Probes `{base_url}/.well-known/security.txt`. Any failure degrades to
/// `exists: false` and never aborts the audit.
pub async fn check_security_txt(client: &reqwest::Client, base_url: &str) -> SecurityTxtProbe {
    let url = format!("{base_url}/.well-known/security.txt");
    match client.get(&url).timeout(AUXILIARY_TIMEOUT).send().await {
        Ok(response) => SecurityTxtProbe {
            exists: response.status().is_success(),
        },
        Err(e) => {
            debug!(url = %url, error = %e, "security.txt probe failed; treating as absent.");
            SecurityTxtProbe { exists: false }
        }
    }
}

/// Probes `{base_url}/robots.txt` and, when present, scans the body for
/// sensitive path disclosures. Any failure degrades to both flags false.
pub async fn check_robots_txt(client: &reqwest::Client, base_url: &str) -> RobotsTxtProbe {
    let url = format!("{base_url}/robots.txt");
    let response = match client.get(&url).timeout(AUXILIARY_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %url, error = %e, "robots.txt probe failed; treating as absent.");
            return RobotsTxtProbe::default();
        }
    };
    if !response.status().is_success() {
        return RobotsTxtProbe::default();
    }
    match response.text().await {
        Ok(body) => RobotsTxtProbe {
            exists: true,
            exposes_sensitive: exposes_sensitive_paths(&body),
        },
        Err(e) => {
            debug!(url = %url, error = %e, "robots.txt body unreadable; treating as absent.");
            RobotsTxtProbe::default()
        }
    }
}

/// True when the robots.txt body mentions any sensitive path fragment,
/// case-insensitively, anywhere in the file.
fn exposes_sensitive_paths(body: &str) -> bool {
    let lower = body.to_lowercase();
    SENSITIVE_PATHS.iter().any(|p| lower.contains(p))
}
