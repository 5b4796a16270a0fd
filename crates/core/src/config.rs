//! Application configuration, built once at startup.
//!
//! There are no module-level toggles: the config is constructed from a
//! deployment profile plus overrides and passed by reference (or `Arc`) to
//! every collaborator.

use std::time::Duration;

/// Deployment profile selecting endpoint defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
	Development,
	#[default]
	Production,
}

impl std::str::FromStr for Profile {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"development" | "dev" => Ok(Profile::Development),
			"production" | "prod" => Ok(Profile::Production),
			_ => Err(format!("unknown profile: {s}")),
		}
	}
}

impl std::fmt::Display for Profile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Profile::Development => write!(f, "development"),
			Profile::Production => write!(f, "production"),
		}
	}
}

/// Runtime configuration shared by all collaborators.
#[derive(Debug, Clone)]
pub struct AppConfig {
	/// Base URL of the auth backend, without a trailing slash.
	pub api_url: String,
	/// OAuth client identifier registered with the identity provider.
	pub google_client_id: String,
	/// Identifier of the companion extension on the message channel.
	pub extension_id: String,
	/// Timeout applied to each backend HTTP call.
	pub http_timeout: Duration,
	/// Initial interval between widget readiness polls.
	pub widget_poll_initial: Duration,
	/// Cap the poll interval doubles up to.
	pub widget_poll_cap: Duration,
	/// Overall deadline for the widget to become ready.
	pub widget_deadline: Duration,
}

impl AppConfig {
	/// Endpoint defaults for a deployment profile.
	pub fn for_profile(profile: Profile) -> Self {
		let api_url = match profile {
			Profile::Development => "http://localhost:3001",
			Profile::Production => "https://comment-assistant-backend.onrender.com",
		};
		Self {
			api_url: api_url.to_string(),
			google_client_id:
				"1029011666173-vsciccbv75nn94m3ib734k7r1bfn3qg3.apps.googleusercontent.com"
					.to_string(),
			extension_id: "lefahakdejoafdagopoabflodfdkgnch".to_string(),
			http_timeout: Duration::from_secs(10),
			widget_poll_initial: Duration::from_millis(100),
			widget_poll_cap: Duration::from_millis(1600),
			widget_deadline: Duration::from_secs(15),
		}
	}
}
