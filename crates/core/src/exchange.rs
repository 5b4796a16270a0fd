//! Credential exchange with the auth backend.

use gatepass_protocol::{ExchangeRequest, ExchangeResponse};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{ExchangeError, LogoutNotifyError};
use crate::session::{IdentityCredential, Session};

/// HTTP client for the backend auth endpoints.
pub struct AuthExchange {
	client: reqwest::Client,
	api_url: String,
}

impl AuthExchange {
	pub fn new(config: &AppConfig) -> Result<Self, ExchangeError> {
		let client = reqwest::Client::builder()
			.timeout(config.http_timeout)
			.build()
			.map_err(|e| ExchangeError::Transport(format!("failed to create HTTP client: {e}")))?;
		Ok(Self { client, api_url: config.api_url.clone() })
	}

	/// Exchanges a signed identity credential for application tokens.
	///
	/// Success is keyed on the body's `success` flag, not HTTP status. There
	/// is no automatic retry; the caller decides whether to prompt again.
	pub async fn exchange(&self, credential: &IdentityCredential) -> Result<Session, ExchangeError> {
		debug!(
			target = "gatepass.exchange",
			credential = %credential.preview(),
			api_url = %self.api_url,
			"exchanging credential"
		);

		let response = self
			.client
			.post(format!("{}/auth/google", self.api_url))
			.json(&ExchangeRequest { token: credential.as_str().to_string() })
			.send()
			.await
			.map_err(|e| ExchangeError::Transport(e.to_string()))?;

		let body: ExchangeResponse = response
			.json()
			.await
			.map_err(|e| ExchangeError::Malformed(e.to_string()))?;

		session_from_response(body)
	}

	/// Notifies the backend of a logout. Best-effort: the caller logs the
	/// error and completes the local logout regardless.
	pub async fn notify_logout(&self, access_token: &str) -> Result<(), LogoutNotifyError> {
		let response = self
			.client
			.post(format!("{}/auth/logout", self.api_url))
			.bearer_auth(access_token)
			.send()
			.await
			.map_err(|e| LogoutNotifyError(e.to_string()))?;

		if !response.status().is_success() {
			return Err(LogoutNotifyError(format!("unexpected status {}", response.status())));
		}
		Ok(())
	}
}

/// Maps an exchange response body onto a session, failing closed on gaps.
fn session_from_response(body: ExchangeResponse) -> Result<Session, ExchangeError> {
	if !body.success {
		return Err(ExchangeError::Rejected(
			body.error.unwrap_or_else(|| "authentication failed".to_string()),
		));
	}
	let access_token = body.access_token.ok_or(ExchangeError::Incomplete("accessToken"))?;
	let refresh_token = body.refresh_token.ok_or(ExchangeError::Incomplete("refreshToken"))?;
	let user = body.user.ok_or(ExchangeError::Incomplete("user"))?;
	Ok(Session { access_token, refresh_token, user })
}
