//! HTTP client wrapper that sends every request through an [`IntervalGate`].

use super::IntervalGate;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

/// A `reqwest::Client` whose requests are serialized behind a minimum interval.
///
/// Building a request is free; only [`RateLimitedClient::send`] waits for the
/// gate. All clones of the inner client share the same connection pool, but the
/// gate belongs to this wrapper, so share the wrapper (e.g. in an `Arc`) to
/// share the limit.
pub struct RateLimitedClient {
    client: Client,
    gate: IntervalGate,
}

impl RateLimitedClient {
    pub fn new(client: Client, min_interval: Duration) -> Self {
        Self {
            client,
            gate: IntervalGate::new(min_interval),
        }
    }

    /// Create a wrapper around a default client with the given request timeout.
    pub fn with_timeout(timeout: Duration, min_interval: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, min_interval))
    }

    pub fn min_interval(&self) -> Duration {
        self.gate.interval()
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.client.delete(url)
    }

    /// Wait for the next gate slot, then send the request.
    pub async fn send(&self, request: RequestBuilder) -> reqwest::Result<Response> {
        self.gate.acquire().await;
        request.send().await
    }
}
