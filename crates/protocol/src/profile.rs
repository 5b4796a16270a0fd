//! Account profile as returned by the auth backend.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile.
///
/// Immutable once received; a re-login replaces it wholesale, it is never
/// patched field-by-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	pub id: String,
	pub email: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub picture: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn picture_is_optional() {
		let user: UserProfile =
			serde_json::from_str(r#"{"id":"1","email":"a@b.com","name":"A"}"#).unwrap();
		assert_eq!(user.id, "1");
		assert!(user.picture.is_none());

		let json = serde_json::to_value(&user).unwrap();
		assert!(json.get("picture").is_none(), "absent picture must not serialize");
	}
}
