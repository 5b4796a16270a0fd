//! Extension bridge: best-effort session sync with the companion extension.
//!
//! The host's message-passing capability may or may not exist (extension not
//! installed, host API absent), so it is an optional injected dependency.
//! Absence is not an error: the web session remains valid independent of
//! extension sync. Inbound extension-initiated logout arrives on a broadcast
//! channel; dropping a subscription detaches it cleanly.

use std::sync::Arc;

use async_trait::async_trait;
use gatepass_protocol::{ExtensionAck, WebAppMessage};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::session::Session;

pub mod fake;

/// Host-provided message-passing capability toward the extension.
#[async_trait]
pub trait Messenger: Send + Sync {
	async fn send(&self, message: WebAppMessage) -> Result<ExtensionAck, SyncError>;
}

/// Outcome of a best-effort notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
	/// The extension acknowledged the message.
	Delivered,
	/// No messaging capability in this host; not an error.
	Unavailable,
	/// The channel exists but delivery failed; logged, never fatal.
	Failed,
}

/// Handle used by the transport side to raise the external logout signal.
#[derive(Clone)]
pub struct LogoutHandle {
	tx: broadcast::Sender<()>,
}

impl LogoutHandle {
	/// Raises the signal. Delivered to current subscribers only; a send with
	/// no subscribers is discarded.
	pub fn raise(&self) {
		let _ = self.tx.send(());
	}
}

/// Subscription to extension-initiated logout signals.
///
/// One subscription per mounted dashboard view; dropping it unsubscribes, so
/// nothing is delivered after teardown.
pub struct LogoutSubscription {
	rx: broadcast::Receiver<()>,
}

impl LogoutSubscription {
	/// Waits for the next logout signal; `None` when the bridge is gone.
	pub async fn recv(&mut self) -> Option<()> {
		loop {
			match self.rx.recv().await {
				Ok(()) => return Some(()),
				Err(broadcast::error::RecvError::Lagged(_)) => continue,
				Err(broadcast::error::RecvError::Closed) => return None,
			}
		}
	}
}

/// The channel keeping the extension's copy of the session in sync.
pub struct ExtensionBridge {
	messenger: Option<Arc<dyn Messenger>>,
	logout_tx: broadcast::Sender<()>,
}

impl ExtensionBridge {
	/// Creates a bridge over an optional messaging capability.
	pub fn new(messenger: Option<Arc<dyn Messenger>>) -> Self {
		let (logout_tx, _) = broadcast::channel(8);
		if messenger.is_none() {
			info!(target = "gatepass.bridge", "extension messaging unavailable; session sync disabled");
		}
		Self { messenger, logout_tx }
	}

	/// Sends the session to the extension.
	pub async fn notify_session(&self, session: &Session) -> Result<SyncStatus, SyncError> {
		let message = WebAppMessage::Auth {
			access_token: session.access_token.clone(),
			refresh_token: session.refresh_token.clone(),
			user: session.user.clone(),
		};
		self.notify(message).await
	}

	/// Tells the extension the web session ended.
	pub async fn notify_logout(&self) -> Result<SyncStatus, SyncError> {
		self.notify(WebAppMessage::Logout).await
	}

	async fn notify(&self, message: WebAppMessage) -> Result<SyncStatus, SyncError> {
		let Some(messenger) = &self.messenger else {
			debug!(target = "gatepass.bridge", "no messenger; skipping extension notification");
			return Ok(SyncStatus::Unavailable);
		};

		let ack = messenger.send(message).await?;
		if !ack.success {
			return Err(SyncError::Rejected(
				ack.error.unwrap_or_else(|| "extension sync failed".to_string()),
			));
		}
		debug!(target = "gatepass.bridge", "extension acknowledged message");
		Ok(SyncStatus::Delivered)
	}

	/// Subscribes to extension-initiated logout signals.
	pub fn subscribe_logout(&self) -> LogoutSubscription {
		LogoutSubscription { rx: self.logout_tx.subscribe() }
	}

	/// Handle for the transport to feed inbound logout signals.
	pub fn logout_handle(&self) -> LogoutHandle {
		LogoutHandle { tx: self.logout_tx.clone() }
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use gatepass_protocol::UserProfile;

	use super::fake::FakeMessenger;
	use super::*;

	fn session() -> Session {
		Session {
			access_token: "A".into(),
			refresh_token: "R".into(),
			user: UserProfile {
				id: "1".into(),
				email: "a@b.com".into(),
				name: "A".into(),
				picture: None,
			},
		}
	}

	#[tokio::test]
	async fn missing_capability_is_unavailable_not_an_error() {
		let bridge = ExtensionBridge::new(None);
		let status = bridge.notify_session(&session()).await.unwrap();
		assert_eq!(status, SyncStatus::Unavailable);
	}

	#[tokio::test]
	async fn delivered_session_carries_tokens_and_user() {
		let messenger = Arc::new(FakeMessenger::new());
		let bridge = ExtensionBridge::new(Some(messenger.clone()));

		let status = bridge.notify_session(&session()).await.unwrap();
		assert_eq!(status, SyncStatus::Delivered);

		let sent = messenger.take_sent();
		assert_eq!(sent.len(), 1);
		match &sent[0] {
			WebAppMessage::Auth { access_token, refresh_token, user } => {
				assert_eq!(access_token, "A");
				assert_eq!(refresh_token, "R");
				assert_eq!(user.email, "a@b.com");
			}
			other => panic!("expected WEB_APP_AUTH, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn rejected_ack_surfaces_as_sync_error() {
		let messenger = Arc::new(FakeMessenger::new());
		messenger.push_ack(Ok(ExtensionAck { success: false, error: Some("no session slot".into()) }));
		let bridge = ExtensionBridge::new(Some(messenger));

		match bridge.notify_logout().await {
			Err(SyncError::Rejected(msg)) => assert_eq!(msg, "no session slot"),
			other => panic!("expected Rejected, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn dropped_subscription_receives_nothing() {
		let bridge = ExtensionBridge::new(None);
		let handle = bridge.logout_handle();

		let mut sub = bridge.subscribe_logout();
		handle.raise();
		assert_eq!(sub.recv().await, Some(()));
		drop(sub);

		// Raised with no live subscription: discarded, and a fresh
		// subscription only sees signals raised after it subscribed.
		handle.raise();
		let mut fresh = bridge.subscribe_logout();
		let timed_out = tokio::time::timeout(Duration::from_millis(50), fresh.recv()).await;
		assert!(timed_out.is_err(), "fresh subscription must not replay old signals");
	}
}
