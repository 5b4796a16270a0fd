//! Session controller: the two-state login/logout machine.
//!
//! State is just `Option<Session>` behind a mutex; authentication is derived
//! from its presence, never stored separately. The lock is held only for
//! field access, never across an await. Login effects run in order: persist,
//! best-effort extension sync, state update, navigation target. Logout
//! always completes locally no matter which notifications fail.

use gatepass_protocol::UserProfile;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::bridge::{ExtensionBridge, SyncStatus};
use crate::error::Result;
use crate::exchange::AuthExchange;
use crate::routes::Route;
use crate::session::{IdentityCredential, Session};
use crate::store::SessionStore;

/// What initiated a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutTrigger {
	/// Explicit user action in this app.
	User,
	/// The extension invalidated its copy of the session.
	Extension,
}

/// Result of a successful login transition.
#[derive(Debug)]
pub struct LoginOutcome {
	pub user: UserProfile,
	pub sync: SyncStatus,
	pub navigate_to: Route,
}

/// Result of a logout request.
#[derive(Debug)]
pub struct LogoutOutcome {
	/// False when the controller was already unauthenticated; storage is
	/// still cleared fail-safe, but nothing is notified.
	pub transitioned: bool,
	pub navigate_to: Route,
}

/// Orchestrates store, exchange, and bridge; one instance per process.
pub struct SessionController {
	store: SessionStore,
	exchange: AuthExchange,
	bridge: ExtensionBridge,
	session: Mutex<Option<Session>>,
}

impl SessionController {
	/// Builds the controller and rehydrates persisted state.
	pub fn bootstrap(store: SessionStore, exchange: AuthExchange, bridge: ExtensionBridge) -> Self {
		let session = store.load();
		if let Some(session) = &session {
			info!(target = "gatepass.session", user = %session.user.email, "rehydrated session");
		}
		Self { store, exchange, bridge, session: Mutex::new(session) }
	}

	pub fn is_authenticated(&self) -> bool {
		self.session.lock().is_some()
	}

	pub fn current_user(&self) -> Option<UserProfile> {
		self.session.lock().as_ref().map(|s| s.user.clone())
	}

	pub fn bridge(&self) -> &ExtensionBridge {
		&self.bridge
	}

	/// Runs the login transition: exchange, persist, best-effort extension
	/// sync, state update. Any failure before the state update leaves the
	/// controller unauthenticated.
	pub async fn login(&self, credential: IdentityCredential) -> Result<LoginOutcome> {
		let session = self.exchange.exchange(&credential).await?;

		if let Err(err) = self.store.save(&session) {
			// Fail closed: never keep a session in memory that could not be
			// persisted, and leave no partial write behind.
			warn!(target = "gatepass.session", error = %err, "failed to persist session; aborting login");
			let _ = self.store.clear();
			return Err(err);
		}

		let sync = match self.bridge.notify_session(&session).await {
			Ok(status) => status,
			Err(err) => {
				warn!(target = "gatepass.session", error = %err, "extension sync failed; continuing");
				SyncStatus::Failed
			}
		};

		let user = session.user.clone();
		*self.session.lock() = Some(session);
		info!(target = "gatepass.session", user = %user.email, sync = ?sync, "login complete");

		Ok(LoginOutcome { user, sync, navigate_to: Route::Dashboard })
	}

	/// Runs the logout transition. Local logout always completes; the
	/// backend and extension notifications are best-effort.
	pub async fn logout(&self, trigger: LogoutTrigger) -> LogoutOutcome {
		self.logout_inner(trigger, true).await
	}

	/// Logout without the backend notification.
	pub async fn logout_local(&self, trigger: LogoutTrigger) -> LogoutOutcome {
		self.logout_inner(trigger, false).await
	}

	async fn logout_inner(&self, trigger: LogoutTrigger, notify_backend: bool) -> LogoutOutcome {
		let session = self.session.lock().take();

		let Some(session) = session else {
			if let Err(err) = self.store.clear() {
				warn!(target = "gatepass.session", error = %err, "failed to clear persisted session");
			}
			return LogoutOutcome { transitioned: false, navigate_to: Route::Login };
		};

		if notify_backend {
			if let Err(err) = self.exchange.notify_logout(&session.access_token).await {
				warn!(target = "gatepass.session", error = %err, "backend logout notification failed; continuing");
			}
		}

		// Extension-initiated logouts are not echoed back to the extension.
		if trigger == LogoutTrigger::User {
			if let Err(err) = self.bridge.notify_logout().await {
				warn!(target = "gatepass.session", error = %err, "extension logout notification failed; continuing");
			}
		}

		if let Err(err) = self.store.clear() {
			warn!(target = "gatepass.session", error = %err, "failed to clear persisted session");
		}

		info!(target = "gatepass.session", trigger = ?trigger, "logout complete");
		LogoutOutcome { transitioned: true, navigate_to: Route::Login }
	}
}
