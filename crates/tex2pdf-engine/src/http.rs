//! HTTP client construction for distribution downloads.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Timeout for distribution downloads (the archives are large).
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// User agent for tex2pdf requests.
pub const USER_AGENT: &str = "tex2pdf";

/// Maximum redirect hops before a download fails with a distinct error.
pub const MAX_REDIRECTS: usize = 10;

/// Builds the blocking HTTP client with redirect cap, timeout and user agent.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
}
