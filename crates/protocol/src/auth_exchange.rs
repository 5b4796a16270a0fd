//! Request/response bodies for the backend credential exchange.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Body of `POST /auth/google`: the opaque signed credential from the
/// identity widget, forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
	pub token: String,
}

/// Response body from `POST /auth/google`.
///
/// Success is keyed on the `success` flag, not HTTP status; a 200 with
/// `success: false` is a rejection carrying `error`. The session fields are
/// optional on the wire so a partial body can be detected instead of failing
/// deserialization outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<UserProfile>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}
