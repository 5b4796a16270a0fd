//! Identity provider adapter: binds the host's sign-in widget.
//!
//! The third-party widget loads asynchronously and outside this system's
//! control, so the host is modeled as a pair of optional capabilities
//! ([`WidgetHost::widget`] and [`WidgetHost::mount_point`]) the adapter polls
//! until both exist. Polling is bounded: the interval doubles from a small
//! initial value up to a cap, and the whole wait expires after a configured
//! deadline instead of looping forever.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::WidgetError;
use crate::session::IdentityCredential;

/// Mount point id the sign-in control renders into.
pub const SIGN_IN_MOUNT: &str = "googleSignInDiv";

/// Identifier of the UI node the widget renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint(pub String);

/// Fixed display options for the rendered sign-in control. Not
/// user-configurable at runtime.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
	pub theme: String,
	pub size: String,
	pub kind: String,
	pub shape: String,
	pub text: String,
	pub logo_alignment: String,
}

impl Default for DisplayOptions {
	fn default() -> Self {
		Self {
			theme: "outline".into(),
			size: "large".into(),
			kind: "standard".into(),
			shape: "rectangular".into(),
			text: "signin_with".into(),
			logo_alignment: "left".into(),
		}
	}
}

/// Receives the opaque credential from the widget's completion callback.
#[derive(Clone)]
pub struct CredentialSink {
	tx: mpsc::UnboundedSender<IdentityCredential>,
}

impl CredentialSink {
	/// Forwards a credential verbatim. Delivery after the stream is dropped
	/// is silently discarded.
	pub fn deliver(&self, credential: IdentityCredential) {
		let _ = self.tx.send(credential);
	}
}

/// Stream of credentials produced by user sign-ins.
pub struct CredentialStream {
	rx: mpsc::UnboundedReceiver<IdentityCredential>,
}

impl CredentialStream {
	/// Waits for the next credential; `None` once the widget side is gone.
	pub async fn next(&mut self) -> Option<IdentityCredential> {
		self.rx.recv().await
	}
}

/// The third-party sign-in widget once the host has loaded it.
pub trait SignInWidget: Send + Sync {
	/// One-time initialization: registers the client id and the completion
	/// sink the widget will deliver credentials into.
	fn initialize(&self, client_id: &str, sink: CredentialSink);

	/// Renders the interactive control into the mount point.
	fn render(&self, mount: &MountPoint, options: &DisplayOptions);
}

/// Host environment that may eventually provide the widget and mount point.
pub trait WidgetHost: Send + Sync {
	fn widget(&self) -> Option<Arc<dyn SignInWidget>>;
	fn mount_point(&self, id: &str) -> Option<MountPoint>;
}

/// Binds the sign-in widget once the host makes it available.
pub struct IdentityAdapter {
	host: Arc<dyn WidgetHost>,
	client_id: String,
	display: DisplayOptions,
	poll_initial: Duration,
	poll_cap: Duration,
	deadline: Duration,
	bound: bool,
}

impl IdentityAdapter {
	pub fn new(host: Arc<dyn WidgetHost>, config: &AppConfig) -> Self {
		Self {
			host,
			client_id: config.google_client_id.clone(),
			display: DisplayOptions::default(),
			poll_initial: config.widget_poll_initial,
			poll_cap: config.widget_poll_cap,
			deadline: config.widget_deadline,
			bound: false,
		}
	}

	/// Polls the host until both the widget and the mount point exist, then
	/// performs one-time initialization, renders the control, and returns
	/// the credential stream.
	///
	/// Fails with [`WidgetError::LoadTimeout`] when the deadline expires and
	/// [`WidgetError::AlreadyBound`] on a second call.
	pub async fn bind(&mut self) -> Result<CredentialStream, WidgetError> {
		if self.bound {
			return Err(WidgetError::AlreadyBound);
		}

		let started = Instant::now();
		let mut interval = self.poll_initial;
		let (widget, mount) = loop {
			if let (Some(widget), Some(mount)) =
				(self.host.widget(), self.host.mount_point(SIGN_IN_MOUNT))
			{
				break (widget, mount);
			}
			if started.elapsed() >= self.deadline {
				return Err(WidgetError::LoadTimeout(self.deadline));
			}
			debug!(
				target = "gatepass.widget",
				interval_ms = interval.as_millis() as u64,
				"sign-in widget not ready; waiting"
			);
			tokio::time::sleep(interval).await;
			interval = (interval * 2).min(self.poll_cap);
		};

		let (tx, rx) = mpsc::unbounded_channel();
		widget.initialize(&self.client_id, CredentialSink { tx });
		widget.render(&mount, &self.display);
		self.bound = true;

		debug!(
			target = "gatepass.widget",
			elapsed_ms = started.elapsed().as_millis() as u64,
			"sign-in widget bound"
		);
		Ok(CredentialStream { rx })
	}
}
