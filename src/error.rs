//! Error types for UAM calls.
//!
//! Every failure is surfaced to the caller as one [`Error`]; nothing is
//! retried or swallowed inside the client. [`Error::kind`] folds the variants
//! into the four failure classes callers usually branch on.

use http::{Method, StatusCode};
use serde_json::Value;

/// The main error type for UAM calls.
///
/// # Examples
///
/// ```no_run
/// use uamir::{AssignmentManager, Error, ErrorKind};
///
/// # async fn example() -> Result<(), Error> {
/// let mut manager = AssignmentManager::new("acme", "acme-staffing", 1001).await?;
///
/// let result = manager.assign_document(42, 17, "form").await;
/// match result {
///     Ok(response) => println!("Assigned: {:?}", response.data),
///     Err(e) if e.kind() == ErrorKind::Protocol => {
///         // Usually an expired session key answered with an HTML page.
///         manager.update_session_key().await?;
///     }
///     Err(Error::ActionRejected { envelope, .. }) => {
///         eprintln!("Server refused the assignment: {}", envelope);
///     }
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a status other than 200.
    #[error("{method} request failed with HTTP status {status}")]
    HttpStatus {
        /// The HTTP method of the failed call
        method: Method,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// A 200 response whose body was not valid JSON.
    ///
    /// The most common cause is a stale or invalid session key, for which the
    /// server returns an HTML error page. The encoded request parameters are
    /// kept so the offending call can be reproduced.
    #[error(
        "Response to `{action}` was not JSON-parseable, likely a bad request value or session key \
         (url: {url_params}, data: {}): {serde_error}",
        .body_params.as_deref().unwrap_or("<none>")
    )]
    InvalidJson {
        /// The UAM action name
        action: &'static str,
        /// The encoded URL parameters
        url_params: String,
        /// The encoded POST body, if the call was a POST
        body_params: Option<String>,
        /// The raw response body
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// The JSON response lacked the envelope key expected for the action.
    #[error("Malformed response to `{action}`: {response}")]
    MalformedResponse {
        /// The UAM action name
        action: &'static str,
        /// The whole parsed response
        response: Value,
    },

    /// The envelope was present but reported a failure.
    #[error("Action `{action}` was rejected: {envelope}")]
    ActionRejected {
        /// The UAM action name
        action: &'static str,
        /// The envelope contents, as returned by the server
        envelope: Value,
    },

    /// The `uam` action did not return a session key.
    ///
    /// Usually caused by an unknown site name, a bad admin id or an
    /// unreachable host.
    #[error("Session key not found in response")]
    SessionKeyNotFound {
        /// The raw response body
        raw_response: String,
    },

    /// The arguments of a call cannot form a valid request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid endpoint URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(e)
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP exchange itself failed: network, timeout or a non-200 status.
    Transport,
    /// The server answered 200 but the body was not the expected JSON.
    Protocol,
    /// The JSON was well-formed but the action failed or the envelope was missing.
    Action,
    /// The client could not be set up (including an unobtainable session key),
    /// or a call was made with unusable arguments.
    Configuration,
}

impl Error {
    /// Returns the failure class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use uamir::{Error, ErrorKind};
    ///
    /// let err = Error::ActionRejected {
    ///     action: "assign",
    ///     envelope: serde_json::json!({"code": "FAIL"}),
    /// };
    /// assert_eq!(err.kind(), ErrorKind::Action);
    ///
    /// let err = Error::SessionKeyNotFound { raw_response: String::new() };
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) | Error::Timeout | Error::HttpStatus { .. } => ErrorKind::Transport,
            Error::InvalidJson { .. } => ErrorKind::Protocol,
            Error::MalformedResponse { .. } | Error::ActionRejected { .. } => ErrorKind::Action,
            Error::SessionKeyNotFound { .. }
            | Error::ConfigurationError(_)
            | Error::InvalidArgument(_)
            | Error::InvalidUrl(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the HTTP status code for `HttpStatus` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpStatus { raw_response, .. }
            | Error::InvalidJson { raw_response, .. }
            | Error::SessionKeyNotFound { raw_response } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the JSON the server sent back for action failures.
    ///
    /// This is the envelope for `ActionRejected` and the whole body for
    /// `MalformedResponse`.
    pub fn envelope(&self) -> Option<&Value> {
        match self {
            Error::ActionRejected { envelope, .. } => Some(envelope),
            Error::MalformedResponse { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for UAM calls.
pub type Result<T> = std::result::Result<T, Error>;
