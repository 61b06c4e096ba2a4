//! Thin GET/POST layer over the injected `reqwest::Client`.
//!
//! Anything but a 200 is a failure here. Bodies are returned as text; the
//! session-key endpoint answers with a script fragment rather than JSON, so
//! parsing is left to the caller.

use crate::{params::Params, Error, Result};
use http::{header::CONTENT_TYPE, Method, StatusCode};
use std::time::{Duration, Instant};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The raw outcome of a successful HTTP exchange.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
    pub latency: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl Transport {
    pub fn new(http_client: reqwest::Client, endpoint: String, timeout: Option<Duration>) -> Self {
        Self {
            http_client,
            endpoint,
            timeout,
        }
    }

    /// Formats the request URL for the given parameters.
    pub fn url(&self, params: &Params) -> String {
        crate::params::build_url(&self.endpoint, params)
    }

    pub async fn get(&self, url: &str) -> Result<RawResponse> {
        self.execute(Method::GET, url, None).await
    }

    pub async fn post(&self, url: &str, body: String) -> Result<RawResponse> {
        self.execute(Method::POST, url, Some(body)).await
    }

    async fn execute(&self, method: Method, url: &str, body: Option<String>) -> Result<RawResponse> {
        tracing::debug!(method = %method, endpoint = %self.endpoint, "Executing HTTP request");

        let start_time = Instant::now();
        let mut request = self.http_client.request(method.clone(), url);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let latency = start_time.elapsed();

        tracing::info!(
            method = %method,
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if status != StatusCode::OK {
            tracing::error!(
                method = %method,
                status = status.as_u16(),
                response = %body,
                "Unexpected HTTP status"
            );

            return Err(Error::HttpStatus {
                method,
                status,
                raw_response: body,
            });
        }

        Ok(RawResponse {
            status,
            body,
            latency,
        })
    }
}
