//! Authenticated identity record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The identity returned by the login endpoint.
///
/// Only `accessToken` and `firstName` are interpreted; every other field the
/// endpoint returns is kept verbatim so the stored session mirrors the full
/// response.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default, deserialize_with = "crate::lenient::string_or_default")]
    pub first_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Builds a session from a login response body.
    ///
    /// Returns `None` unless the body is an object carrying a non-empty
    /// string `accessToken`.
    pub fn from_login_response(body: Value) -> Option<Self> {
        let has_token = body
            .get("accessToken")
            .and_then(Value::as_str)
            .is_some_and(|token| !token.trim().is_empty());
        if !has_token {
            return None;
        }
        serde_json::from_value(body).ok()
    }

    /// The `username` field, when the endpoint returned one.
    pub fn username(&self) -> Option<&str> {
        self.extra.get("username").and_then(Value::as_str)
    }

    /// Name used in greetings: first name, then username, then a fallback.
    pub fn display_name(&self) -> &str {
        if !self.first_name.trim().is_empty() {
            return &self.first_name;
        }
        self.username().unwrap_or("there")
    }
}

// Tokens are never printed in full.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("first_name", &self.first_name)
            .field("extra_fields", &self.extra.len())
            .finish()
    }
}

fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}
