//! Loopback sign-in host serving the Google Identity Services widget.
//!
//! A localhost HTTP server stands in for the product's sign-in page: it
//! serves a minimal page loading the GIS script with the configured client
//! id, and receives the signed credential the widget POSTs back to
//! `/credential`. The host exposes the widget through the core's
//! [`WidgetHost`]/[`SignInWidget`] traits; the credential is forwarded
//! verbatim into the adapter's sink.

use std::sync::Arc;

use anyhow::Context;
use axum::Form;
use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use gatepass::session::IdentityCredential;
use gatepass::widget::{CredentialSink, DisplayOptions, MountPoint, SignInWidget, WidgetHost};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::info;

/// State shared between the HTTP handlers and the widget seam.
#[derive(Default)]
struct Shared {
	client_id: Mutex<Option<String>>,
	sink: Mutex<Option<CredentialSink>>,
	display: Mutex<DisplayOptions>,
}

/// The loopback sign-in page host.
pub struct SignInHost {
	shared: Arc<Shared>,
	port: u16,
}

impl SignInHost {
	/// Binds the loopback listener and starts serving the sign-in page.
	/// Returns the host and the bound port (useful with `--port 0`).
	pub async fn start(port: u16) -> anyhow::Result<Arc<Self>> {
		let shared = Arc::new(Shared::default());

		let app = Router::new()
			.route("/", get(page))
			.route("/credential", post(credential))
			.with_state(Arc::clone(&shared));

		let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
			.await
			.with_context(|| format!("failed to bind sign-in page to 127.0.0.1:{port}"))?;
		let addr = listener.local_addr()?;

		tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		info!(target = "gatepass", %addr, "sign-in page listening");
		Ok(Arc::new(Self { shared, port: addr.port() }))
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}/", self.port)
	}
}

impl WidgetHost for SignInHost {
	fn widget(&self) -> Option<Arc<dyn SignInWidget>> {
		Some(Arc::new(HostWidget { shared: Arc::clone(&self.shared) }))
	}

	fn mount_point(&self, id: &str) -> Option<MountPoint> {
		Some(MountPoint(id.to_string()))
	}
}

/// The GIS widget as served by the loopback page.
struct HostWidget {
	shared: Arc<Shared>,
}

impl SignInWidget for HostWidget {
	fn initialize(&self, client_id: &str, sink: CredentialSink) {
		*self.shared.client_id.lock() = Some(client_id.to_string());
		*self.shared.sink.lock() = Some(sink);
	}

	fn render(&self, _mount: &MountPoint, options: &DisplayOptions) {
		*self.shared.display.lock() = options.clone();
	}
}

async fn page(State(shared): State<Arc<Shared>>) -> Html<String> {
	let client_id = shared.client_id.lock().clone().unwrap_or_default();
	let display = shared.display.lock().clone();
	Html(render_page(&client_id, &display))
}

/// GIS posts the credential as form data when `login_uri` is configured.
#[derive(Deserialize)]
struct CredentialPost {
	credential: String,
}

async fn credential(
	State(shared): State<Arc<Shared>>,
	Form(body): Form<CredentialPost>,
) -> Html<&'static str> {
	if let Some(sink) = shared.sink.lock().as_ref() {
		sink.deliver(IdentityCredential::new(body.credential));
	}
	Html("<p>Signed in. You can close this tab and return to the terminal.</p>")
}

fn render_page(client_id: &str, display: &DisplayOptions) -> String {
	format!(
		r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Sign in - Gatepass</title>
<script src="https://accounts.google.com/gsi/client" async defer></script>
</head>
<body>
<h2>Sign in to your account</h2>
<div id="g_id_onload"
     data-client_id="{client_id}"
     data-login_uri="/credential"
     data-auto_prompt="false"></div>
<div id="googleSignInDiv" class="g_id_signin"
     data-theme="{theme}"
     data-size="{size}"
     data-type="{kind}"
     data-shape="{shape}"
     data-text="{text}"
     data-logo_alignment="{logo_alignment}"></div>
</body>
</html>
"#,
		theme = display.theme,
		size = display.size,
		kind = display.kind,
		shape = display.shape,
		text = display.text,
		logo_alignment = display.logo_alignment,
	)
}
