use std::net::IpAddr;
use std::time::Duration;

use onthefly_core::AppError;
use onthefly_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::body::read_body;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// HTTP fetcher using reqwest.
///
/// Sends a fixed header set mimicking a command-line HTTP client,
/// which cuts down on bot-blocking false negatives from third-party
/// sites. One bounded-timeout GET per call; retries are the retry
/// coordinator's business, not this type's.
///
/// By default, SSRF protection is **enabled** — requests to
/// private/reserved IP ranges are blocked, since target URLs arrive
/// straight from untrusted query parameters. Use
/// [`allow_private_urls`](Self::allow_private_urls) to disable this
/// (e.g. for CLI usage where the user controls the machine).
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    ssrf_protection: bool,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.5.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            ssrf_protection: true,
        })
    }

    /// Disable SSRF protection, allowing requests to private/reserved IPs.
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if self.ssrf_protection {
            validate_url(url).await?;
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchFailed {
                status: status.as_u16(),
            });
        }

        read_body(response.bytes_stream()).await
    }
}

// ---------------------------------------------------------------------------
// SSRF protection
// ---------------------------------------------------------------------------

/// Reject URLs whose scheme is not http/https or whose host resolves
/// to a private/reserved address.
async fn validate_url(url: &str) -> Result<(), AppError> {
    let parsed =
        Url::parse(url).map_err(|e| AppError::NetworkError(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::NetworkError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::NetworkError("URL has no host".to_string()))?;

    // IP literals are checked directly; hostnames go through DNS and
    // every resolved address must pass.
    if let Ok(ip) = host.parse::<IpAddr>() {
        return check_ip(host, ip);
    }

    let port = parsed
        .port()
        .unwrap_or(if parsed.scheme() == "https" { 443 } else { 80 });
    let addrs: Vec<_> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| AppError::NetworkError(format!("DNS resolution failed for {host}: {e}")))?
        .collect();

    if addrs.is_empty() {
        return Err(AppError::NetworkError(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }

    for addr in addrs {
        check_ip(host, addr.ip())?;
    }
    Ok(())
}

fn check_ip(host: &str, ip: IpAddr) -> Result<(), AppError> {
    if is_private_ip(ip) {
        return Err(AppError::NetworkError(format!(
            "SSRF blocked: {host} resolves to private/reserved IP {ip}"
        )));
    }
    Ok(())
}

/// Check if an IP address is in a private/reserved/link-local range.
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local() // includes cloud metadata 169.254.169.254
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64) // CGN
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xFFC0) == 0xFE80 // link-local
                || (v6.segments()[0] & 0xFE00) == 0xFC00 // unique local
                || v6
                    .to_ipv4_mapped()
                    .is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}
