//! Scripted in-memory messenger for unit and integration tests.
//!
//! Records every outbound message and replays queued acks, so bridge and
//! controller behavior can be tested without a real extension channel.

use async_trait::async_trait;
use gatepass_protocol::{ExtensionAck, WebAppMessage};
use parking_lot::Mutex;

use super::Messenger;
use crate::error::SyncError;

/// Messenger double: captures sends, replays scripted acks.
#[derive(Default)]
pub struct FakeMessenger {
	sent: Mutex<Vec<WebAppMessage>>,
	script: Mutex<Vec<Result<ExtensionAck, SyncError>>>,
}

impl FakeMessenger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues the response for the next send. With an empty script every
	/// send succeeds.
	pub fn push_ack(&self, ack: Result<ExtensionAck, SyncError>) {
		self.script.lock().push(ack);
	}

	/// Takes all captured messages, clearing the buffer.
	pub fn take_sent(&self) -> Vec<WebAppMessage> {
		std::mem::take(&mut *self.sent.lock())
	}
}

#[async_trait]
impl Messenger for FakeMessenger {
	async fn send(&self, message: WebAppMessage) -> Result<ExtensionAck, SyncError> {
		self.sent.lock().push(message);
		let mut script = self.script.lock();
		if script.is_empty() {
			return Ok(ExtensionAck { success: true, error: None });
		}
		script.remove(0)
	}
}
