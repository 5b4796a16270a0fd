//! Messages exchanged with the companion browser extension.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Outbound messages from the web app to the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebAppMessage {
	/// Delivers the freshly established session to the extension.
	#[serde(rename = "WEB_APP_AUTH", rename_all = "camelCase")]
	Auth {
		access_token: String,
		refresh_token: String,
		user: UserProfile,
	},
	/// Tells the extension the web session has ended.
	#[serde(rename = "WEB_APP_LOGOUT")]
	Logout,
}

/// Acknowledgement the extension returns for an outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionAck {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Inbound signals raised by the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtensionSignal {
	/// The extension-side session was invalidated; carries no payload.
	#[serde(rename = "EXTENSION_LOGOUT")]
	Logout,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user() -> UserProfile {
		UserProfile {
			id: "1".into(),
			email: "a@b.com".into(),
			name: "A".into(),
			picture: None,
		}
	}

	#[test]
	fn auth_message_wire_shape() {
		let message = WebAppMessage::Auth {
			access_token: "A".into(),
			refresh_token: "R".into(),
			user: user(),
		};
		let json = serde_json::to_value(&message).unwrap();
		assert_eq!(json["type"], "WEB_APP_AUTH");
		assert_eq!(json["accessToken"], "A");
		assert_eq!(json["refreshToken"], "R");
		assert_eq!(json["user"]["email"], "a@b.com");
	}

	#[test]
	fn logout_message_is_tag_only() {
		let json = serde_json::to_value(WebAppMessage::Logout).unwrap();
		assert_eq!(json, serde_json::json!({ "type": "WEB_APP_LOGOUT" }));
	}

	#[test]
	fn extension_logout_signal_round_trips() {
		let signal: ExtensionSignal =
			serde_json::from_str(r#"{"type":"EXTENSION_LOGOUT"}"#).unwrap();
		assert_eq!(signal, ExtensionSignal::Logout);
	}

	#[test]
	fn ack_defaults_error_to_none() {
		let ack: ExtensionAck = serde_json::from_str(r#"{"success":true}"#).unwrap();
		assert!(ack.success);
		assert!(ack.error.is_none());
	}
}
