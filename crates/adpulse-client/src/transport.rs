//! Blocking HTTP transport with retry classification.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use adpulse_core::SourceError;
use tracing::{debug, warn};

use crate::retry::RetryConfig;

/// HTTP method set needed by the upstream clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// Request body variants the upstreams accept.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// HTTP request envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<HttpBody>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
            timeout_ms: 30_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("authorization", format!("Bearer {token}"))
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(HttpBody::Json(value));
        self
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(HttpBody::Form(fields));
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<f64>,
}

impl HttpResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Blocking transport wrapping a shared reqwest client.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::blocking::Client,
    retry: RetryConfig,
}

impl Transport {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent("adpulse/0.1.0")
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            retry,
        }
    }

    /// Executes the request, retrying retryable failures per the policy.
    /// A success here means any 2xx; non-2xx after the retry budget maps
    /// into a [`SourceError`].
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SourceError> {
        let mut attempt: u32 = 0;

        loop {
            debug!(url = %request.url, attempt, "upstream request");

            match self.send_once(request) {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status;
                    if self.retry.enabled
                        && attempt < self.retry.max_retries
                        && self.retry.should_retry_status(status)
                    {
                        let delay = self.retry.delay_for(attempt, status, response.retry_after);
                        warn!(url = %request.url, status, ?delay, "retrying upstream request");
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(classify_status(status, &response.body));
                }
                Err(error) => {
                    let recoverable = (error.is_timeout() && self.retry.retry_on_timeout)
                        || (error.is_connect() && self.retry.retry_on_connect);
                    if self.retry.enabled && attempt < self.retry.max_retries && recoverable {
                        let delay = self.retry.backoff.delay(attempt);
                        warn!(url = %request.url, ?delay, "retrying after transport error");
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(SourceError::transport(format!(
                        "request to {} failed: {error}",
                        request.url
                    )));
                }
            }
        }
    }

    fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = builder.timeout(Duration::from_millis(request.timeout_ms));

        match &request.body {
            Some(HttpBody::Json(value)) => builder = builder.json(value),
            Some(HttpBody::Form(fields)) => builder = builder.form(fields),
            None => {}
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok());
        let body = response.text()?;

        Ok(HttpResponse {
            status,
            body,
            retry_after,
        })
    }
}

fn classify_status(status: u16, body: &str) -> SourceError {
    let snippet: String = body.chars().take(200).collect();
    match status {
        401 | 403 => SourceError::configuration(format!(
            "upstream rejected credentials (status {status}): {snippet}"
        )),
        429 => SourceError::rate_limited(format!("rate limit persisted after retries: {snippet}")),
        500..=599 => {
            SourceError::transport(format!("upstream error (status {status}): {snippet}"))
        }
        _ => SourceError::upstream(format!("unexpected status {status}: {snippet}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_normalized() {
        let request = HttpRequest::get("https://example.test/x").with_bearer("token-123");
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token-123")
        );
    }

    #[test]
    fn query_pairs_may_repeat() {
        let request = HttpRequest::get("https://example.test/x")
            .with_query("campaignIds", "1")
            .with_query("campaignIds", "2");
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.query[0].1, "1");
        assert_eq!(request.query[1].1, "2");
    }

    #[test]
    fn status_classification_matches_error_taxonomy() {
        assert_eq!(classify_status(401, "").code(), "source.configuration");
        assert_eq!(classify_status(429, "").code(), "source.rate_limited");
        assert_eq!(classify_status(503, "").code(), "source.transport");
        assert_eq!(classify_status(404, "").code(), "source.upstream");
    }
}
