//! Typed views over the action envelopes in UAM responses.
//!
//! Each action nests its outcome under one top-level key (`assignobj`,
//! `emailobj`, `obj`). Parsing an envelope yields an [`Outcome`] instead of
//! probing the JSON ad hoc: the envelope is missing, it reports a failure, or
//! it carries the expected payload.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Result of inspecting one action envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The envelope is present and reports success.
    Accepted(T),
    /// The envelope is present but reports a failure; holds the envelope.
    Rejected(Value),
    /// The envelope key is absent (or null) in the response.
    Malformed,
}

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    code: Option<Value>,
}

/// Checks a `{"<key>": {"code": "OK", ...}}` envelope.
///
/// Anything other than the string `"OK"` in `code` is a rejection, including
/// a missing code or an envelope that is not an object.
pub fn status(body: &Value, key: &str) -> Outcome<()> {
    let Some(envelope) = body.get(key).filter(|v| !v.is_null()) else {
        return Outcome::Malformed;
    };

    let accepted = StatusEnvelope::deserialize(envelope)
        .ok()
        .and_then(|e| e.code)
        .is_some_and(|code| code.as_str() == Some(STATUS_OK));

    if accepted {
        Outcome::Accepted(())
    } else {
        Outcome::Rejected(envelope.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(default)]
    data: Option<Vec<AssignedDocument>>,
}

/// Reads the credential listing under `obj.data`.
///
/// Records without a credential id are dropped: the listing also contains
/// credentials that exist for the site but were never requested from this
/// user.
pub fn assigned_documents(body: &Value) -> Outcome<Vec<AssignedDocument>> {
    let Some(envelope) = body.get("obj").filter(|v| !v.is_null()) else {
        return Outcome::Malformed;
    };

    match ListingEnvelope::deserialize(envelope) {
        Ok(ListingEnvelope { data: Some(docs) }) => Outcome::Accepted(
            docs.into_iter()
                .filter(|doc| !doc.credential_id.is_empty())
                .collect(),
        ),
        Ok(ListingEnvelope { data: None }) => Outcome::Rejected(envelope.clone()),
        Err(e) => {
            tracing::warn!(error = %e, "Unexpected shape of credential listing");
            Outcome::Rejected(envelope.clone())
        }
    }
}

/// A credential request assigned to a user, as listed by `GetTempCredentials`.
///
/// Scalar fields arrive as strings, numbers or null depending on the record;
/// all are normalised to strings, with null becoming empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssignedDocument {
    #[serde(rename = "rsscredid", default, deserialize_with = "lenient_string")]
    pub credential_id: String,
    #[serde(rename = "remindedby", default, deserialize_with = "lenient_string")]
    pub reminded_by: String,
    #[serde(rename = "assignedby", default, deserialize_with = "lenient_string")]
    pub assigned_by: String,
    #[serde(rename = "assignmentid", default, deserialize_with = "lenient_string")]
    pub assignment_id: String,
    #[serde(rename = "firstname", default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(rename = "lastname", default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(rename = "adminusername", default, deserialize_with = "lenient_string")]
    pub admin_username: String,
    #[serde(rename = "credentialname", default, deserialize_with = "lenient_string")]
    pub credential_name: String,
    #[serde(rename = "versionid", default, deserialize_with = "lenient_string")]
    pub version_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(rename = "remindersent", default, deserialize_with = "lenient_string")]
    pub reminder_sent: String,
    #[serde(rename = "dateassigned", default, deserialize_with = "lenient_string")]
    pub date_assigned: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub doc_type: String,
    /// Fields not covered above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
