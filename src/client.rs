//! The assignment manager: one method per UAM action.
//!
//! [`AssignmentManager`] is the main entry point. Use [`ClientBuilder`] to
//! point it at a different endpoint or tune the HTTP client.

use crate::{
    envelope::{self, AssignedDocument, Outcome},
    params::Params,
    session::{self, ClientContext, RSS_BASE, RSS_HTTP},
    transport::{RawResponse, Transport},
    Error, Response, Result,
};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

const ASSIGN_ACTION: &str = "assign";
const LIST_ACTION: &str = "GetTempCredentials";
const REMIND_ACTION: &str = "sendEmail";
const DELETE_ACTION: &str = "delete";

const ASSIGN_ENVELOPE: &str = "assignobj";
const REMIND_ENVELOPE: &str = "emailobj";

/// Client for the Universal Assignment Manager.
///
/// Assigns document requests to candidates, lists them, sends reminders and
/// deletes them. A session key is fetched when the manager is built and is
/// attached to every action afterwards. When the server stops accepting it
/// (typically seen as [`Error::InvalidJson`]), call
/// [`update_session_key`](Self::update_session_key) and retry; the manager
/// never does this on its own.
///
/// # Examples
///
/// ```no_run
/// use uamir::AssignmentManager;
///
/// # async fn example() -> Result<(), uamir::Error> {
/// let manager = AssignmentManager::new("acme", "acme-staffing", 1001).await?;
///
/// manager.assign_document(42, 17, "form").await?;
///
/// for doc in manager.get_assigned_documents(42).await? {
///     println!("{} ({})", doc.credential_name, doc.assignment_id);
/// }
///
/// manager.send_reminder_for_all(42).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AssignmentManager {
    transport: Transport,
    context: ClientContext,
}

impl AssignmentManager {
    /// Creates a manager for the given sites and admin user, fetching a
    /// session key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SessionKeyNotFound`] when the server does not hand
    /// out a session key, or with a transport error if it cannot be reached.
    pub async fn new(
        rss_url: impl Into<String>,
        tss_url: impl Into<String>,
        rss_admin_user_id: impl fmt::Display,
    ) -> Result<Self> {
        Self::builder()
            .rss_url(rss_url)
            .tss_url(tss_url)
            .admin_user_id(rss_admin_user_id)
            .build()
            .await
    }

    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The identity and current session of this manager.
    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// The session key attached to action requests.
    pub fn session_key(&self) -> &str {
        self.context.session_key()
    }

    /// Fetches a new session key and replaces the current one.
    ///
    /// If fetching fails the current key is kept.
    pub async fn update_session_key(&mut self) -> Result<()> {
        session::refresh(&self.transport, &mut self.context).await
    }

    /// Assigns a document to a user, at version 0.
    ///
    /// See [`assign_document_version`](Self::assign_document_version).
    pub async fn assign_document(
        &self,
        user_id: impl fmt::Display,
        doc_id: impl fmt::Display,
        doc_type: &str,
    ) -> Result<Response<Value>> {
        self.assign_document_version(user_id, doc_id, doc_type, 0)
            .await
    }

    /// Assigns a specific version of a document to a user.
    ///
    /// Returns the parsed response when the `assignobj` envelope reports `OK`.
    pub async fn assign_document_version(
        &self,
        user_id: impl fmt::Display,
        doc_id: impl fmt::Display,
        doc_type: &str,
        version_id: impl fmt::Display,
    ) -> Result<Response<Value>> {
        let url_params = self.action_url_params(ASSIGN_ACTION, true);
        let body_params = Params::new()
            .with("tempid", self.context.temp_id())
            .with("RSSID", doc_id.to_string())
            .with("RSSUserID", user_id.to_string())
            .with("type", doc_type)
            .with("TSSUserID", self.context.tss_user_id())
            .with("AssignedBy", self.context.assigned_by())
            .with("VERSID", version_id.to_string());

        self.post_status_action(ASSIGN_ACTION, ASSIGN_ENVELOPE, url_params, body_params)
            .await
    }

    /// Lists the documents currently requested from a user.
    ///
    /// Credentials that were never assigned to the user are left out.
    pub async fn get_assigned_documents(
        &self,
        user_id: impl fmt::Display,
    ) -> Result<Vec<AssignedDocument>> {
        let url_params = Params::new()
            .with("RSSURL", self.context.rss_url())
            .with("action", LIST_ACTION)
            .with("RSSBASE", self.context.rss_base())
            .with("RSSUserID", user_id.to_string())
            .with("TSSUserID", self.context.tss_user_id())
            .with("sessionKey", self.context.session_key())
            .with("ADUserID", self.context.admin_user_id())
            .with("TempID", self.context.temp_id());

        let url = self.transport.url(&url_params);
        let raw = self.transport.get(&url).await?;
        let body = parse_json(LIST_ACTION, &url_params, None, &raw)?;

        match envelope::assigned_documents(&body) {
            Outcome::Accepted(docs) => {
                tracing::debug!(count = docs.len(), "Retrieved assigned documents");
                Ok(docs)
            }
            outcome => Err(action_failure(LIST_ACTION, outcome, body)),
        }
    }

    /// Sends a reminder email for the given assignments.
    ///
    /// `ids` are assignment ids and `types` their document types, in the same
    /// order; both are sent as parallel arrays.
    pub async fn send_reminder<I, T>(
        &self,
        user_id: impl fmt::Display,
        ids: &[I],
        types: &[T],
    ) -> Result<Response<Value>>
    where
        I: fmt::Display,
        T: fmt::Display,
    {
        if ids.len() != types.len() {
            return Err(Error::InvalidArgument(format!(
                "reminder needs one type per assignment id ({} ids, {} types)",
                ids.len(),
                types.len()
            )));
        }

        let url_params = self.action_url_params(REMIND_ACTION, true);
        let body_params = Params::new()
            .with("tempid", self.context.temp_id())
            .with("IDs", ids)
            .with("RSSUserID", user_id.to_string())
            .with("type", types)
            .with("TSSUserID", self.context.tss_user_id())
            .with("AssignedBy", self.context.assigned_by());

        self.post_status_action(REMIND_ACTION, REMIND_ENVELOPE, url_params, body_params)
            .await
    }

    /// Sends one reminder covering every document currently assigned to a user.
    ///
    /// When nothing is assigned the reminder is still sent, with empty id and
    /// type lists; how the server treats that is up to the server.
    pub async fn send_reminder_for_all(
        &self,
        user_id: impl fmt::Display,
    ) -> Result<Response<Value>> {
        let user_id = user_id.to_string();
        let docs = self.get_assigned_documents(&user_id).await?;

        let (ids, types): (Vec<&str>, Vec<&str>) = docs
            .iter()
            .map(|doc| (doc.assignment_id.as_str(), doc.doc_type.as_str()))
            .unzip();

        if ids.is_empty() {
            tracing::warn!(user_id = %user_id, "No assigned documents; sending empty reminder");
        }

        self.send_reminder(&user_id, ids.as_slice(), types.as_slice())
            .await
    }

    /// Removes the request for a document from a user.
    ///
    /// The server answers `OK` even when no such request exists.
    pub async fn delete_request(
        &self,
        user_id: impl fmt::Display,
        doc_id: impl fmt::Display,
        doc_type: &str,
    ) -> Result<Response<Value>> {
        let url_params = self.action_url_params(DELETE_ACTION, false);
        let body_params = Params::new()
            .with("id", self.context.temp_id())
            .with("RSSID", doc_id.to_string())
            .with("RSSUserID", user_id.to_string())
            .with("type", doc_type)
            .with("TSSUserID", self.context.tss_user_id());

        self.post_status_action(DELETE_ACTION, ASSIGN_ENVELOPE, url_params, body_params)
            .await
    }

    fn action_url_params(&self, action: &'static str, with_dsn: bool) -> Params {
        let mut params = Params::new()
            .with("RSSURL", self.context.rss_url())
            .with("action", action);
        if with_dsn {
            params.push("RSSDSN", self.context.rss_dsn());
        }
        params
            .with("RSSBASE", self.context.rss_base())
            .with("sessionKey", self.context.session_key())
    }

    /// POSTs an action and checks its `code == "OK"` envelope.
    async fn post_status_action(
        &self,
        action: &'static str,
        envelope_key: &str,
        url_params: Params,
        body_params: Params,
    ) -> Result<Response<Value>> {
        let url = self.transport.url(&url_params);
        let raw = self
            .transport
            .post(&url, body_params.encode())
            .await?;
        let body = parse_json(action, &url_params, Some(&body_params), &raw)?;

        match envelope::status(&body, envelope_key) {
            Outcome::Accepted(()) => Ok(Response::new(body, raw.body, raw.status, raw.latency)),
            outcome => Err(action_failure(action, outcome, body)),
        }
    }
}

fn parse_json(
    action: &'static str,
    url_params: &Params,
    body_params: Option<&Params>,
    raw: &RawResponse,
) -> Result<Value> {
    serde_json::from_str(&raw.body).map_err(|e| {
        tracing::error!(
            action = action,
            error = %e,
            raw_response = %raw.body,
            "Response was not JSON-parseable"
        );

        Error::InvalidJson {
            action,
            url_params: url_params.encode(),
            body_params: body_params.map(Params::encode),
            raw_response: raw.body.clone(),
            serde_error: e.to_string(),
        }
    })
}

fn action_failure<T>(action: &'static str, outcome: Outcome<T>, body: Value) -> Error {
    match outcome {
        Outcome::Rejected(envelope) => {
            tracing::warn!(action = action, envelope = %envelope, "Action rejected");
            Error::ActionRejected { action, envelope }
        }
        Outcome::Malformed | Outcome::Accepted(_) => {
            tracing::warn!(action = action, response = %body, "Malformed response");
            Error::MalformedResponse {
                action,
                response: body,
            }
        }
    }
}

/// Builder for configuring and creating an [`AssignmentManager`].
///
/// # Examples
///
/// ```no_run
/// use uamir::AssignmentManager;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), uamir::Error> {
/// let manager = AssignmentManager::builder()
///     .rss_url("acme")
///     .tss_url("acme-staffing")
///     .admin_user_id(1001)
///     .timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    rss_url: Option<String>,
    tss_url: Option<String>,
    admin_user_id: Option<String>,
    endpoint: Option<Url>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` targeting the production endpoint.
    pub fn new() -> Self {
        Self {
            rss_url: None,
            tss_url: None,
            admin_user_id: None,
            endpoint: None,
            timeout: None,
            http_client: None,
        }
    }

    /// Sets the site name of the recruiting product.
    pub fn rss_url(mut self, rss_url: impl Into<String>) -> Self {
        self.rss_url = Some(rss_url.into());
        self
    }

    /// Sets the site name of the staffing product.
    pub fn tss_url(mut self, tss_url: impl Into<String>) -> Self {
        self.tss_url = Some(tss_url.into());
        self
    }

    /// Sets the admin user that assigns documents.
    pub fn admin_user_id(mut self, admin_user_id: impl fmt::Display) -> Self {
        self.admin_user_id = Some(admin_user_id.to_string());
        self
    }

    /// Overrides the UAM endpoint, `https://agencyrecruiting.apihealthcare.com/UAM2/index.cfm`
    /// by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn endpoint(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.endpoint = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses the given HTTP client instead of a default one.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Builds the manager and fetches its first session key.
    ///
    /// # Errors
    ///
    /// Returns an error if a site name or the admin user is missing, if the
    /// HTTP client cannot be created, or if no session key is obtained.
    pub async fn build(self) -> Result<AssignmentManager> {
        let rss_url = required(self.rss_url, "rss_url")?;
        let tss_url = required(self.tss_url, "tss_url")?;
        let admin_user_id = required(self.admin_user_id, "admin_user_id")?;

        let endpoint = match self.endpoint {
            Some(url) => url.as_str().trim_end_matches(['?', '/']).to_string(),
            None => default_endpoint(),
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        let transport = Transport::new(http_client, endpoint, self.timeout);
        let mut context = ClientContext::new(rss_url, tss_url, admin_user_id);
        session::refresh(&transport, &mut context).await?;

        Ok(AssignmentManager { transport, context })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_endpoint() -> String {
    format!("{RSS_HTTP}://{RSS_BASE}/UAM2/index.cfm")
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::ConfigurationError(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(session_key: &str) -> AssignmentManager {
        let transport = Transport::new(reqwest::Client::new(), default_endpoint(), None);
        let mut context = ClientContext::new("acme".into(), "acme-staffing".into(), "1001".into());
        context.set_session_key(session_key.into());
        AssignmentManager { transport, context }
    }

    #[test]
    fn default_endpoint_is_production() {
        assert_eq!(
            default_endpoint(),
            "https://agencyrecruiting.apihealthcare.com/UAM2/index.cfm"
        );
    }

    #[test]
    fn action_url_params_carry_session_key() {
        let manager = manager("K1");
        assert_eq!(
            manager.action_url_params(ASSIGN_ACTION, true).encode(),
            "RSSURL=acme&action=assign&RSSDSN=FCVA765_RSS_Live\
             &RSSBASE=agencyrecruiting.apihealthcare.com&sessionKey=K1"
        );
    }

    #[test]
    fn delete_url_params_omit_dsn() {
        let manager = manager("K1");
        let params = manager.action_url_params(DELETE_ACTION, false);
        assert!(params.get("RSSDSN").is_none());
        assert_eq!(
            manager.transport.url(&params),
            "https://agencyrecruiting.apihealthcare.com/UAM2/index.cfm\
             ?RSSURL=acme&action=delete&RSSBASE=agencyrecruiting.apihealthcare.com&sessionKey=K1"
        );
    }

    #[test]
    fn missing_fields_are_reported() {
        assert!(required(None, "rss_url").is_err());
        assert!(required(Some(String::new()), "tss_url").is_err());
        assert_eq!(required(Some("acme".into()), "rss_url").unwrap(), "acme");
    }

    #[tokio::test]
    async fn build_without_site_fails_before_any_request() {
        let result = AssignmentManager::builder()
            .tss_url("acme-staffing")
            .admin_user_id(1001)
            .build()
            .await;

        match result {
            Err(Error::ConfigurationError(msg)) => assert!(msg.contains("rss_url")),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }
}
