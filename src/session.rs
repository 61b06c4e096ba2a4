//! Session key lifecycle and the per-client identity it is issued for.

use crate::{params::Params, transport::Transport, Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Sentinel the API expects for the staffing-side user id.
pub const TSS_USER_ID: &str = "0";
/// Sentinel the API expects for the temp id.
pub const TEMP_ID: &str = "0";
/// Sentinel the API expects for the packet user.
pub const PACKET_USER: &str = "0";
/// Data source name of the recruiting database.
pub const RSS_DSN: &str = "FCVA765_RSS_Live";
/// Host serving the Universal Assignment Manager.
pub const RSS_BASE: &str = "agencyrecruiting.apihealthcare.com";
/// Scheme used to reach [`RSS_BASE`].
pub const RSS_HTTP: &str = "https";

const SESSION_KEY_ACTION: &str = "uam";

fn session_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"sessionKey = '(.*?)';").expect("session key pattern is a valid regex")
    })
}

/// Pulls the token out of a `sessionKey = '<token>';` statement.
///
/// Returns `None` when the statement is missing or the token is empty.
pub fn extract_session_key(body: &str) -> Option<&str> {
    session_key_pattern()
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|key| !key.is_empty())
}

/// Identity and session state of one client.
///
/// Everything except the session key is fixed at construction.
#[derive(Debug, Clone)]
pub struct ClientContext {
    rss_url: String,
    tss_url: String,
    admin_user_id: String,
    session_key: String,
}

impl ClientContext {
    pub(crate) fn new(rss_url: String, tss_url: String, admin_user_id: String) -> Self {
        Self {
            rss_url,
            tss_url,
            admin_user_id,
            session_key: String::new(),
        }
    }

    /// Site name of the recruiting product.
    pub fn rss_url(&self) -> &str {
        &self.rss_url
    }

    /// Site name of the staffing product.
    pub fn tss_url(&self) -> &str {
        &self.tss_url
    }

    /// Admin user that requests are issued on behalf of.
    pub fn admin_user_id(&self) -> &str {
        &self.admin_user_id
    }

    /// Id recorded as the assigner; the admin user.
    pub fn assigned_by(&self) -> &str {
        &self.admin_user_id
    }

    pub fn tss_user_id(&self) -> &str {
        TSS_USER_ID
    }

    pub fn temp_id(&self) -> &str {
        TEMP_ID
    }

    pub fn packet_user(&self) -> &str {
        PACKET_USER
    }

    pub fn rss_dsn(&self) -> &str {
        RSS_DSN
    }

    pub fn rss_base(&self) -> &str {
        RSS_BASE
    }

    pub fn rss_http(&self) -> &str {
        RSS_HTTP
    }

    /// The session key currently attached to action requests.
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub(crate) fn set_session_key(&mut self, key: String) {
        self.session_key = key;
    }

    /// URL parameters of the `uam` action that hands out session keys.
    pub(crate) fn session_key_params(&self) -> Params {
        Params::new()
            .with("action", SESSION_KEY_ACTION)
            .with("rssuserid", self.admin_user_id())
            .with("rssurl", self.rss_url())
            .with("rssdsn", self.rss_dsn())
            .with("packetuser", self.packet_user())
            .with("assignedby", self.admin_user_id())
            .with("tssurl", self.tss_url())
    }
}

/// Requests a new session key for `context`.
///
/// The key is returned, not stored; see [`refresh`].
pub(crate) async fn fetch_session_key(transport: &Transport, context: &ClientContext) -> Result<String> {
    let url = transport.url(&context.session_key_params());
    let response = transport.get(&url).await?;

    match extract_session_key(&response.body) {
        Some(key) => Ok(key.to_string()),
        None => {
            tracing::error!(
                rss_url = %context.rss_url(),
                response = %response.body,
                "Session key not found in response"
            );
            Err(Error::SessionKeyNotFound {
                raw_response: response.body,
            })
        }
    }
}

/// Fetches a fresh session key and stores it in `context`.
///
/// On failure the previous key is left in place.
pub(crate) async fn refresh(transport: &Transport, context: &mut ClientContext) -> Result<()> {
    let key = fetch_session_key(transport, context).await?;
    context.set_session_key(key);
    tracing::info!(rss_url = %context.rss_url(), "Session key refreshed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_key_from_script() {
        let body = "<script>\n var sessionKey = 'ABC123';\n var other = 'x';\n</script>";
        assert_eq!(extract_session_key(body), Some("ABC123"));
    }

    #[test]
    fn extracts_bare_statement() {
        assert_eq!(extract_session_key("sessionKey = 'ABC123';"), Some("ABC123"));
    }

    #[test]
    fn takes_first_statement_and_stops_at_first_terminator() {
        let body = "sessionKey = 'first'; sessionKey = 'second';";
        assert_eq!(extract_session_key(body), Some("first"));
    }

    #[test]
    fn missing_or_empty_key_is_none() {
        assert_eq!(extract_session_key("<html>Login failed</html>"), None);
        assert_eq!(extract_session_key("sessionKey = '';"), None);
        assert_eq!(extract_session_key("sessionKey='ABC';"), None);
    }

    #[test]
    fn session_key_params_use_admin_identity() {
        let context = ClientContext::new("acme".into(), "acme-staffing".into(), "1001".into());
        assert_eq!(
            context.session_key_params().encode(),
            "action=uam&rssuserid=1001&rssurl=acme&rssdsn=FCVA765_RSS_Live\
             &packetuser=0&assignedby=1001&tssurl=acme-staffing"
        );
    }

    #[test]
    fn only_session_key_changes() {
        let mut context = ClientContext::new("acme".into(), "acme-staffing".into(), "1001".into());
        assert_eq!(context.session_key(), "");
        context.set_session_key("K1".into());
        assert_eq!(context.session_key(), "K1");
        assert_eq!(context.assigned_by(), "1001");
        assert_eq!(context.rss_base(), "agencyrecruiting.apihealthcare.com");
    }
}
