//! Response wrapper that keeps the parsed body next to the raw exchange.

use http::StatusCode;
use std::time::Duration;

/// A successful UAM response.
///
/// `data` holds the parsed JSON exactly as the server sent it; the raw body
/// and timing are kept for logging and debugging.
///
/// # Examples
///
/// ```no_run
/// use uamir::AssignmentManager;
///
/// # async fn example() -> Result<(), uamir::Error> {
/// let manager = AssignmentManager::new("acme", "acme-staffing", 1001).await?;
/// let response = manager.delete_request(42, 17, "form").await?;
///
/// println!("Envelope: {}", response.data["assignobj"]);
/// println!("Request took {:?}", response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The parsed response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response. Always 200 for a `Response`.
    pub status: StatusCode,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(data: T, raw_body: String, status: StatusCode, latency: Duration) -> Self {
        Self {
            data,
            raw_body,
            status,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use uamir::Response;
    /// # use http::StatusCode;
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     serde_json::json!({"assignobj": {"code": "OK"}}),
    ///     r#"{"assignobj":{"code":"OK"}}"#.to_string(),
    ///     StatusCode::OK,
    ///     Duration::from_millis(40),
    /// );
    ///
    /// let code = response.map(|v| v["assignobj"]["code"].as_str().map(String::from));
    /// assert_eq!(code.data.as_deref(), Some("OK"));
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            latency: self.latency,
        }
    }

    /// Consumes the response and returns the parsed data.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
