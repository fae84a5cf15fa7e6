//! Page navigation and wait primitives
//!
//! Navigation is single-shot: the capture flow has no retry edges, so a
//! failed load surfaces immediately. The wait helpers cover the two states
//! the flow blocks on: the operator reaching the dashboard URL, and the
//! page's network going quiet.

use crate::error::{Error, NavigationError, Result};
use chromiumoxide::Page;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// URL validation utilities
pub struct UrlValidator;

impl UrlValidator {
    /// Validate a URL for navigation
    pub fn validate(url: &str) -> std::result::Result<(), String> {
        if url.is_empty() {
            return Err("URL cannot be empty".to_string());
        }

        if !url.starts_with("http://")
            && !url.starts_with("https://")
            && !url.starts_with("file://")
        {
            return Err(format!(
                "URL must start with http://, https://, or file://: {}",
                url
            ));
        }

        if url.len() > 2048 {
            return Err("URL exceeds maximum length of 2048 characters".to_string());
        }

        Ok(())
    }

    /// Check if URL points to localhost
    pub fn is_localhost(url: &str) -> bool {
        let lower = url.to_lowercase();
        lower.contains("://localhost")
            || lower.contains("://127.0.0.1")
            || lower.contains("://[::1]")
            || lower.contains("://0.0.0.0")
    }
}

/// Outcome of the in-page network-idle poll
#[derive(Debug, Deserialize)]
struct IdleProbe {
    #[serde(rename = "readyState")]
    ready_state: String,
    #[serde(rename = "resourceCount")]
    resource_count: u64,
    #[serde(rename = "waitedMs")]
    waited_ms: u64,
}

/// Navigation and wait operations over a CDP page
pub struct PageNavigator;

impl PageNavigator {
    /// Navigate to a URL and wait for the load event. One attempt, no retries.
    #[instrument(skip(page))]
    pub async fn goto(page: &Page, url: &str) -> Result<String> {
        UrlValidator::validate(url).map_err(NavigationError::InvalidUrl)?;

        if !UrlValidator::is_localhost(url) {
            warn!("Navigating to a non-localhost URL: {}", url);
        }

        info!("Navigating to: {}", url);

        page.goto(url)
            .await
            .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

        // Settle on the load event before handing the page back
        let load_script = r#"
            new Promise(resolve => {
                if (document.readyState === 'complete') {
                    resolve(true);
                } else {
                    window.addEventListener('load', () => resolve(true));
                }
            })
        "#;
        page.evaluate(load_script)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let final_url = page
            .url()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        debug!("Navigation complete: {} -> {}", url, final_url);
        Ok(final_url)
    }

    /// Poll the page URL until it matches a glob pattern or the deadline
    /// passes. Returns the matched URL. This is the manual-login wait: the
    /// operator has `timeout` to get the page onto a matching URL.
    #[instrument(skip(page))]
    pub async fn wait_for_url_match(
        page: &Page,
        pattern: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<String> {
        let matcher = glob::Pattern::new(pattern)
            .map_err(|e| NavigationError::InvalidUrl(format!("bad URL pattern {pattern}: {e}")))?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(url) = page.url().await.map_err(|e| Error::cdp(e.to_string()))? {
                if matcher.matches(&url) {
                    info!("URL matched {}: {}", pattern, url);
                    return Ok(url);
                }
            }

            if Instant::now() >= deadline {
                return Err(NavigationError::LoginTimeout {
                    pattern: pattern.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into());
            }

            tokio::time::sleep(poll).await;
        }
    }

    /// Wait until the page's network goes quiet: the resource-timing entry
    /// count stops growing for `quiet` while `document.readyState` is
    /// complete. The poll runs inside the page; no outer deadline is imposed
    /// beyond the CDP client's own command timeout.
    #[instrument(skip(page))]
    pub async fn wait_for_network_idle(page: &Page, quiet: Duration, poll: Duration) -> Result<()> {
        let js = format!(
            r#"(async () => {{
                const idleMs = {idle_ms};
                const interval = {interval_ms};

                const start = Date.now();
                let lastCount = 0;
                let stableMs = 0;

                try {{ lastCount = performance.getEntriesByType('resource').length; }} catch (_) {{ lastCount = 0; }}

                while (true) {{
                    await new Promise(r => setTimeout(r, interval));
                    let curCount = lastCount;
                    try {{ curCount = performance.getEntriesByType('resource').length; }} catch (_) {{ curCount = lastCount; }}

                    const ready = (document.readyState === 'complete');
                    if (ready && curCount === lastCount) {{
                        stableMs += interval;
                        if (stableMs >= idleMs) {{
                            return {{ readyState: document.readyState, resourceCount: curCount, waitedMs: (Date.now() - start) }};
                        }}
                    }} else {{
                        stableMs = 0;
                    }}
                    lastCount = curCount;
                }}
            }})()"#,
            idle_ms = quiet.as_millis(),
            interval_ms = poll.as_millis(),
        );

        let value = page
            .evaluate(js)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        match value.into_value::<IdleProbe>() {
            Ok(probe) => {
                debug!(
                    "Network idle after {}ms (readyState={}, {} resources)",
                    probe.waited_ms, probe.ready_state, probe.resource_count
                );
            }
            Err(e) => {
                // The wait itself succeeded; the summary is diagnostics only
                debug!("Network-idle probe result not parseable: {}", e);
            }
        }

        Ok(())
    }

    /// Fixed delay for client-side rendering to settle
    pub async fn settle(delay: Duration) {
        debug!("Settling for {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation_valid_http() {
        assert!(UrlValidator::validate("http://localhost:3000/login").is_ok());
    }

    #[test]
    fn test_url_validation_valid_https() {
        assert!(UrlValidator::validate("https://example.com").is_ok());
    }

    #[test]
    fn test_url_validation_valid_file() {
        assert!(UrlValidator::validate("file:///path/to/file.html").is_ok());
    }

    #[test]
    fn test_url_validation_empty() {
        let result = UrlValidator::validate("");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("empty"));
    }

    #[test]
    fn test_url_validation_no_protocol() {
        let result = UrlValidator::validate("localhost:3000");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("must start with"));
    }

    #[test]
    fn test_url_validation_invalid_protocol() {
        assert!(UrlValidator::validate("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_validation_too_long() {
        let long_url = format!("https://example.com/{}", "a".repeat(3000));
        let result = UrlValidator::validate(&long_url);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("maximum length"));
    }

    #[test]
    fn test_localhost_check() {
        assert!(UrlValidator::is_localhost("http://localhost:3000"));
        assert!(UrlValidator::is_localhost("https://127.0.0.1/path"));
        assert!(UrlValidator::is_localhost("http://[::1]:8080"));
        assert!(UrlValidator::is_localhost("http://0.0.0.0:8080"));
    }

    #[test]
    fn test_localhost_check_external() {
        assert!(!UrlValidator::is_localhost("https://example.com"));
        assert!(!UrlValidator::is_localhost("http://192.168.1.1"));
    }

    #[test]
    fn test_localhost_case_insensitive() {
        assert!(UrlValidator::is_localhost("http://LOCALHOST:3000"));
    }

    #[test]
    fn test_localhost_in_path_not_matched() {
        assert!(!UrlValidator::is_localhost(
            "https://example.com/localhost/api"
        ));
    }

    #[test]
    fn test_url_glob_matches_home() {
        let matcher = glob::Pattern::new("**/home").unwrap();
        assert!(matcher.matches("http://localhost:3000/home"));
        assert!(matcher.matches("https://localhost/app/home"));
    }

    #[test]
    fn test_url_glob_rejects_other_routes() {
        let matcher = glob::Pattern::new("**/home").unwrap();
        assert!(!matcher.matches("http://localhost:3000/login"));
        assert!(!matcher.matches("http://localhost:3000/home/extra"));
    }

    #[test]
    fn test_idle_probe_deserializes() {
        let probe: IdleProbe = serde_json::from_value(serde_json::json!({
            "readyState": "complete",
            "resourceCount": 42,
            "waitedMs": 750,
        }))
        .unwrap();
        assert_eq!(probe.ready_state, "complete");
        assert_eq!(probe.resource_count, 42);
        assert_eq!(probe.waited_ms, 750);
    }
}
