use anyhow::{Context, Result};
use std::time::Duration;

/// The listing site serves real markup only to browser-looking clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64)";

/// Build the HTTP client shared by index, detail and routing requests.
/// The timeout applies to every request; a timed-out fetch is handled at
/// the page or listing level, never as a run failure.
pub fn create_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}
