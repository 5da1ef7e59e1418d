use anyhow::{anyhow, Context, Result};
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::types::DirectionResponse;
use crate::config::RoutingConfig;

/// Client for the external transit routing service.
///
/// The routing query is mandatory for every listing: without a transit
/// duration a listing cannot be ranked, so callers drop the listing on
/// failure instead of defaulting the value.
pub struct RoutingClient {
    http: reqwest::Client,
    endpoint: String,
    destination: String,
    region: String,
    api_key: String,
}

impl RoutingClient {
    pub fn new(http: reqwest::Client, config: &RoutingConfig, api_key: String) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            destination: config.destination.clone(),
            region: config.region.clone(),
            api_key,
        }
    }

    /// Transit duration in seconds from `origin` to the configured
    /// destination. Retries transient failures with exponential backoff.
    pub async fn transit_seconds(&self, origin: &str) -> Result<u64> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(std::time::Duration::from_secs(5))
            .take(3);

        let response: DirectionResponse = Retry::spawn(retry_strategy, || async {
            self.http
                .get(&self.endpoint)
                .query(&[
                    ("mode", "transit"),
                    ("origin", origin),
                    ("destination", self.destination.as_str()),
                    ("region", self.region.as_str()),
                    ("output", "json"),
                    ("ak", self.api_key.as_str()),
                ])
                .send()
                .await
                .with_context(|| format!("Routing request failed for {}", origin))?
                .error_for_status()
                .context("Routing service returned an error status")?
                .json::<DirectionResponse>()
                .await
                .context("Malformed routing response")
        })
        .await?;

        duration_from(response)
    }
}

/// Duration of the first scheme of the first route in a response.
fn duration_from(response: DirectionResponse) -> Result<u64> {
    if response.status != 0 {
        let detail = response
            .message
            .map(|m| format!(": {}", m))
            .unwrap_or_default();
        return Err(anyhow!(
            "Routing service rejected the query (status {}{})",
            response.status,
            detail
        ));
    }
    response
        .result
        .and_then(|r| r.routes.into_iter().next())
        .and_then(|r| r.scheme.into_iter().next())
        .map(|s| s.duration)
        .ok_or_else(|| anyhow!("Routing response has no transit route"))
}
