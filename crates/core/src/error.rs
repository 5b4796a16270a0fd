//! Error taxonomy for the session flow.
//!
//! The split mirrors the failure policy: [`ExchangeError`] and
//! [`WidgetError`] surface to the user and leave state unchanged,
//! [`SyncError`] and [`LogoutNotifyError`] are logged and swallowed by their
//! callers, and a malformed persisted session ([`ParseError`]) is purged and
//! treated as absent.

use std::time::Duration;

use thiserror::Error;

/// Failure of the credential exchange with the auth backend.
#[derive(Debug, Error)]
pub enum ExchangeError {
	/// The backend answered but rejected the credential (`success: false`).
	#[error("backend rejected credential: {0}")]
	Rejected(String),
	/// The response body did not parse as an exchange response.
	#[error("malformed exchange response: {0}")]
	Malformed(String),
	/// The backend reported success but omitted part of the session.
	#[error("incomplete exchange response: missing {0}")]
	Incomplete(&'static str),
	/// Transport-level failure reaching the backend.
	#[error("auth backend unreachable: {0}")]
	Transport(String),
}

/// Malformed persisted session found during rehydration.
#[derive(Debug, Error)]
#[error("persisted session invalid: {0}")]
pub struct ParseError(pub String);

/// Non-fatal failure delivering session state to the extension.
#[derive(Debug, Error)]
pub enum SyncError {
	/// The extension received the message but reported failure.
	#[error("extension rejected message: {0}")]
	Rejected(String),
	/// The message channel itself failed.
	#[error("extension channel failed: {0}")]
	Channel(String),
}

/// Non-fatal failure notifying the backend of a logout.
#[derive(Debug, Error)]
#[error("logout notification failed: {0}")]
pub struct LogoutNotifyError(pub String);

/// Identity widget binding failure.
#[derive(Debug, Error)]
pub enum WidgetError {
	/// The host widget never became ready within the configured deadline.
	#[error("sign-in widget did not load within {0:?}")]
	LoadTimeout(Duration),
	/// `bind()` was called twice; widget initialization is one-time.
	#[error("identity adapter is already bound")]
	AlreadyBound,
}

/// Umbrella error for the crate.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	#[error(transparent)]
	Widget(#[from] WidgetError),
	#[error("storage error: {0}")]
	Io(#[from] std::io::Error),
	#[error("serialization error: {0}")]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
