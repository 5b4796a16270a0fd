//! WebSocket relay carrying session messages to the companion extension.
//!
//! The extension's content script connects to a loopback WebSocket; outbound
//! [`WebAppMessage`]s are forwarded over it and the extension replies with an
//! [`ExtensionAck`]. One message is in flight at a time. Inbound
//! `EXTENSION_LOGOUT` signals are raised into the bridge through an attached
//! [`LogoutHandle`]. A relay that fails to bind its port is treated as the
//! messaging capability being absent, not as a fatal error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use futures::{SinkExt, StreamExt};
use gatepass::bridge::{LogoutHandle, Messenger};
use gatepass::error::SyncError;
use gatepass_protocol::{ExtensionAck, ExtensionSignal, WebAppMessage};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// How long to wait for the extension to acknowledge a message.
const ACK_TIMEOUT: Duration = Duration::from_secs(5);

struct Outbound {
	message: WebAppMessage,
	ack_tx: oneshot::Sender<ExtensionAck>,
}

struct RelayShared {
	/// Sender into the currently connected socket task, if any.
	conn: tokio::sync::Mutex<Option<mpsc::Sender<Outbound>>>,
	logout: parking_lot::Mutex<Option<LogoutHandle>>,
	/// Origin browsers send for the companion extension's pages.
	allowed_origin: String,
}

/// Loopback WebSocket relay toward the extension.
pub struct ExtensionRelay {
	shared: Arc<RelayShared>,
	port: u16,
}

impl ExtensionRelay {
	/// Binds the relay and starts accepting extension connections. Browser
	/// connections are only accepted from the configured extension's origin.
	///
	/// Returns `None` when the port cannot be bound (another instance is
	/// already relaying, or the port is taken); the caller then runs without
	/// extension sync.
	pub async fn start(port: u16, extension_id: &str) -> Option<Arc<Self>> {
		let shared = Arc::new(RelayShared {
			conn: tokio::sync::Mutex::new(None),
			logout: parking_lot::Mutex::new(None),
			allowed_origin: format!("chrome-extension://{extension_id}"),
		});

		let app = Router::new()
			.route("/", any(ws_handler))
			.with_state(Arc::clone(&shared));

		let listener = match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
			Ok(listener) => listener,
			Err(err) => {
				warn!(target = "gatepass.relay", %err, port, "could not bind extension relay; continuing without extension sync");
				return None;
			}
		};
		let addr = match listener.local_addr() {
			Ok(addr) => addr,
			Err(err) => {
				warn!(target = "gatepass.relay", %err, "could not resolve relay address; continuing without extension sync");
				return None;
			}
		};

		tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		info!(target = "gatepass.relay", %addr, "extension relay listening");
		Some(Arc::new(Self { shared, port: addr.port() }))
	}

	/// Wires the inbound logout signal into the bridge. Called after the
	/// controller exists; until then inbound logouts are dropped.
	pub fn attach_logout(&self, handle: LogoutHandle) {
		*self.shared.logout.lock() = Some(handle);
	}

	pub fn port(&self) -> u16 {
		self.port
	}
}

#[async_trait]
impl Messenger for ExtensionRelay {
	async fn send(&self, message: WebAppMessage) -> Result<ExtensionAck, SyncError> {
		let Some(tx) = self.shared.conn.lock().await.clone() else {
			return Err(SyncError::Channel("extension not connected".to_string()));
		};

		let (ack_tx, ack_rx) = oneshot::channel();
		tx.send(Outbound { message, ack_tx })
			.await
			.map_err(|_| SyncError::Channel("extension disconnected".to_string()))?;

		match tokio::time::timeout(ACK_TIMEOUT, ack_rx).await {
			Ok(Ok(ack)) => Ok(ack),
			Ok(Err(_)) => Err(SyncError::Channel("extension disconnected before acknowledging".to_string())),
			Err(_) => Err(SyncError::Channel("timed out waiting for extension acknowledgment".to_string())),
		}
	}
}

async fn ws_handler(
	State(shared): State<Arc<RelayShared>>,
	headers: HeaderMap,
	ws: WebSocketUpgrade,
) -> Response {
	if !origin_allowed(&shared.allowed_origin, headers.get(header::ORIGIN)) {
		warn!(
			target = "gatepass.relay",
			origin = ?headers.get(header::ORIGIN),
			"rejected connection from unexpected origin"
		);
		return StatusCode::FORBIDDEN.into_response();
	}
	ws.on_upgrade(move |socket| handle_socket(socket, shared))
}

/// Browsers always send an `Origin` header; it must match the configured
/// extension. Non-browser clients send none and are let through.
fn origin_allowed(expected: &str, origin: Option<&HeaderValue>) -> bool {
	match origin {
		None => true,
		Some(value) => value.to_str().is_ok_and(|origin| origin == expected),
	}
}

async fn handle_socket(socket: WebSocket, shared: Arc<RelayShared>) {
	// Capacity 1: a single message in flight, matching the ack protocol.
	let (outbound_tx, mut outbound_rx) = mpsc::channel::<Outbound>(1);
	{
		let mut conn = shared.conn.lock().await;
		if conn.is_some() {
			debug!(target = "gatepass.relay", "replacing previous extension connection");
		}
		*conn = Some(outbound_tx.clone());
	}
	println!("Extension connected");

	let (mut sender, mut receiver) = socket.split();
	let mut pending: Option<oneshot::Sender<ExtensionAck>> = None;

	loop {
		tokio::select! {
			outbound = outbound_rx.recv() => {
				let Some(Outbound { message, ack_tx }) = outbound else { break };
				let payload = match serde_json::to_string(&message) {
					Ok(payload) => payload,
					Err(err) => {
						warn!(target = "gatepass.relay", %err, "failed to encode message for extension");
						continue;
					}
				};
				if sender.send(Message::Text(payload.into())).await.is_err() {
					break;
				}
				pending = Some(ack_tx);
			}
			inbound = receiver.next() => {
				let Some(Ok(message)) = inbound else { break };
				let Message::Text(text) = message else { continue };
				handle_inbound(&shared, &text, &mut pending);
			}
		}
	}

	detach_conn(&shared, &outbound_tx).await;
}

/// Unregisters a closing connection. A reconnect may already have replaced
/// this task's sender; only the task's own channel is cleared, so a stale
/// close never detaches the live connection.
async fn detach_conn(shared: &RelayShared, outbound_tx: &mpsc::Sender<Outbound>) {
	let mut conn = shared.conn.lock().await;
	if conn.as_ref().is_some_and(|tx| tx.same_channel(outbound_tx)) {
		conn.take();
		println!("Extension disconnected");
	}
}

fn handle_inbound(
	shared: &RelayShared,
	text: &str,
	pending: &mut Option<oneshot::Sender<ExtensionAck>>,
) {
	if let Ok(signal) = serde_json::from_str::<ExtensionSignal>(text) {
		match signal {
			ExtensionSignal::Logout => {
				info!(target = "gatepass.relay", "extension requested logout");
				if let Some(handle) = shared.logout.lock().as_ref() {
					handle.raise();
				}
			}
		}
		return;
	}

	if let Ok(ack) = serde_json::from_str::<ExtensionAck>(text) {
		if let Some(ack_tx) = pending.take() {
			let _ = ack_tx.send(ack);
		} else {
			debug!(target = "gatepass.relay", "unsolicited acknowledgment from extension");
		}
		return;
	}

	debug!(target = "gatepass.relay", payload = text, "unrecognized message from extension");
}

#[cfg(test)]
mod tests {
	use super::*;

	const EXTENSION_ID: &str = "lefahakdejoafdagopoabflodfdkgnch";

	fn shared(logout: Option<LogoutHandle>) -> RelayShared {
		RelayShared {
			conn: tokio::sync::Mutex::new(None),
			logout: parking_lot::Mutex::new(logout),
			allowed_origin: format!("chrome-extension://{EXTENSION_ID}"),
		}
	}

	#[tokio::test]
	async fn send_without_connection_is_a_channel_error() {
		let relay = ExtensionRelay::start(0, EXTENSION_ID).await.expect("ephemeral port should bind");
		match relay.send(WebAppMessage::Logout).await {
			Err(SyncError::Channel(msg)) => assert!(msg.contains("not connected")),
			other => panic!("expected Channel error, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn inbound_logout_raises_attached_handle() {
		use gatepass::bridge::ExtensionBridge;

		let bridge = ExtensionBridge::new(None);
		let shared = shared(Some(bridge.logout_handle()));
		let mut sub = bridge.subscribe_logout();

		let mut pending = None;
		handle_inbound(&shared, r#"{"type":"EXTENSION_LOGOUT"}"#, &mut pending);

		assert_eq!(sub.recv().await, Some(()));
	}

	#[tokio::test]
	async fn inbound_ack_resolves_pending_send() {
		let shared = shared(None);
		let (ack_tx, ack_rx) = oneshot::channel();
		let mut pending = Some(ack_tx);

		handle_inbound(&shared, r#"{"success":true}"#, &mut pending);

		let ack = ack_rx.await.expect("ack should be resolved");
		assert!(ack.success);
		assert!(pending.is_none());
	}

	#[tokio::test]
	async fn stale_close_does_not_detach_a_newer_connection() {
		let shared = shared(None);
		let (old_tx, _old_rx) = mpsc::channel::<Outbound>(1);
		let (new_tx, _new_rx) = mpsc::channel::<Outbound>(1);

		// The extension reconnected: the new sender replaced the old one.
		*shared.conn.lock().await = Some(new_tx.clone());

		// The replaced socket tears down afterwards; the live connection stays.
		detach_conn(&shared, &old_tx).await;
		assert!(
			shared.conn.lock().await.as_ref().is_some_and(|tx| tx.same_channel(&new_tx)),
			"live connection must survive a stale close"
		);

		// The live connection's own close does detach it.
		detach_conn(&shared, &new_tx).await;
		assert!(shared.conn.lock().await.is_none());
	}

	#[test]
	fn only_the_configured_extension_origin_may_connect() {
		let expected = format!("chrome-extension://{EXTENSION_ID}");
		assert!(origin_allowed(&expected, None), "non-browser clients send no origin");
		assert!(origin_allowed(
			&expected,
			Some(&HeaderValue::from_str(&expected).unwrap())
		));
		assert!(!origin_allowed(
			&expected,
			Some(&HeaderValue::from_static("chrome-extension://aaaabbbbccccddddeeeeffffgggghhhh"))
		));
		assert!(!origin_allowed(
			&expected,
			Some(&HeaderValue::from_static("http://localhost:3000"))
		));
	}
}
