//! Session and credential types with redacted debug output.

use std::fmt;

use gatepass_protocol::UserProfile;

/// Leading characters exposed by token previews in logs.
const PREVIEW_LEN: usize = 10;

/// The authenticated user's token pair plus profile, the unit of
/// login/logout.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
	pub access_token: String,
	pub refresh_token: String,
	pub user: UserProfile,
}

impl Session {
	/// First characters of the access token, for diagnostics.
	pub fn access_token_preview(&self) -> String {
		preview(&self.access_token)
	}

	/// First characters of the refresh token, for diagnostics.
	pub fn refresh_token_preview(&self) -> String {
		preview(&self.refresh_token)
	}
}

impl fmt::Debug for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session")
			.field("access_token", &self.access_token_preview())
			.field("refresh_token", &self.refresh_token_preview())
			.field("user", &self.user)
			.finish()
	}
}

/// Opaque signed credential produced by the sign-in widget.
///
/// Never interpreted here; forwarded verbatim to the backend exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCredential(String);

impl IdentityCredential {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// First characters of the credential, for diagnostics.
	pub fn preview(&self) -> String {
		preview(&self.0)
	}
}

impl fmt::Debug for IdentityCredential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "IdentityCredential({:?})", self.preview())
	}
}

fn preview(token: &str) -> String {
	let head: String = token.chars().take(PREVIEW_LEN).collect();
	if head.len() < token.len() {
		format!("{head}...")
	} else {
		head
	}
}
