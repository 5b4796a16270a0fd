//! Persisted session store with fail-safe purge.
//!
//! A session is persisted as three entries: the access token, the refresh
//! token, and the serialized user profile. If rehydration finds any of them
//! missing, or the profile fails to parse, every session key is purged so no
//! half-valid session can ever be surfaced or rehydrated later.

use std::sync::Arc;

use gatepass_protocol::UserProfile;
use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::session::Session;
use crate::storage::KeyValueStorage;

/// Canonical persisted keys.
const KEY_AUTH_TOKEN: &str = "auth_token";
const KEY_REFRESH_TOKEN: &str = "refreshToken";
const KEY_USER: &str = "user";

/// Legacy key names written by earlier clients; cleared, never read.
const KEY_LEGACY_ACCESS_TOKEN: &str = "accessToken";
const KEY_LEGACY_USER_DATA: &str = "userData";

/// Every key `clear()` and the fail-safe purge remove.
pub const SESSION_KEYS: [&str; 5] = [
	KEY_AUTH_TOKEN,
	KEY_REFRESH_TOKEN,
	KEY_USER,
	KEY_LEGACY_ACCESS_TOKEN,
	KEY_LEGACY_USER_DATA,
];

/// Load/save/clear of the persisted session over any [`KeyValueStorage`].
pub struct SessionStore {
	storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
	pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
		Self { storage }
	}

	/// Rehydrates the persisted session.
	///
	/// A partial or malformed session is purged and reported absent; load
	/// itself never fails.
	pub fn load(&self) -> Option<Session> {
		let access_token = self.storage.get(KEY_AUTH_TOKEN);
		let refresh_token = self.storage.get(KEY_REFRESH_TOKEN);
		let user_json = self.storage.get(KEY_USER);

		match (access_token, refresh_token, user_json) {
			(None, None, None) => None,
			(Some(access_token), Some(refresh_token), Some(user_json)) => {
				match serde_json::from_str::<UserProfile>(&user_json) {
					Ok(user) => {
						debug!(target = "gatepass.store", user = %user.email, "loaded persisted session");
						Some(Session { access_token, refresh_token, user })
					}
					Err(err) => {
						self.purge(ParseError(format!("user profile failed to parse: {err}")));
						None
					}
				}
			}
			_ => {
				self.purge(ParseError("partial session".into()));
				None
			}
		}
	}

	/// Persists the session; called only after a successful exchange.
	pub fn save(&self, session: &Session) -> Result<()> {
		self.storage.set(KEY_AUTH_TOKEN, &session.access_token)?;
		self.storage.set(KEY_REFRESH_TOKEN, &session.refresh_token)?;
		let user = serde_json::to_string(&session.user)?;
		self.storage.set(KEY_USER, &user)?;
		Ok(())
	}

	/// Removes every session key, legacy names included, so no stale
	/// credential can be rehydrated later.
	pub fn clear(&self) -> Result<()> {
		for key in SESSION_KEYS {
			self.storage.remove(key)?;
		}
		Ok(())
	}

	fn purge(&self, reason: ParseError) {
		warn!(target = "gatepass.store", reason = %reason, "purging invalid persisted session");
		if let Err(err) = self.clear() {
			warn!(target = "gatepass.store", error = %err, "failed to purge session keys");
		}
	}
}
