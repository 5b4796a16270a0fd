//! Behavior tests for `gatepass status` and `gatepass logout` against the
//! real binary and a real storage file. Network-facing commands are not
//! exercised here; these paths never touch the backend (logout uses
//! `--local`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;
use tempfile::TempDir;

fn gatepass_binary() -> PathBuf {
	let mut path = std::env::current_exe().expect("current_exe should resolve");
	path.pop();
	path.pop();
	path.push("gatepass");
	path
}

fn run_gatepass(storage: &Path, args: &[&str]) -> (bool, String, String) {
	let output = Command::new(gatepass_binary())
		.arg("-f")
		.arg("json")
		.arg("--storage")
		.arg(storage)
		.args(args)
		.output()
		.expect("failed to execute gatepass");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	(output.status.success(), stdout, stderr)
}

fn run_json(storage: &Path, args: &[&str]) -> (bool, serde_json::Value, String) {
	let (success, stdout, stderr) = run_gatepass(storage, args);
	let parsed = serde_json::from_str::<serde_json::Value>(&stdout)
		.unwrap_or_else(|_| json!({ "raw": stdout }));
	(success, parsed, stderr)
}

fn write_session_file(path: &Path, entries: &[(&str, &str)]) {
	let map: HashMap<&str, &str> = entries.iter().copied().collect();
	std::fs::write(path, serde_json::to_string_pretty(&map).expect("entries serialize"))
		.expect("session file should be written");
}

fn stored_keys(path: &Path) -> Vec<String> {
	let content = match std::fs::read_to_string(path) {
		Ok(content) => content,
		Err(_) => return Vec::new(),
	};
	let map: HashMap<String, String> =
		serde_json::from_str(&content).expect("session file should stay a JSON object");
	let mut keys: Vec<String> = map.into_keys().collect();
	keys.sort();
	keys
}

const USER_JSON: &str = r#"{"id":"u-1","email":"a@b.com","name":"Ada"}"#;

#[test]
fn status_reports_unauthenticated_without_a_session_file() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");

	let (success, json, stderr) = run_json(&storage, &["status"]);
	assert!(success, "status failed: {stderr}");
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "status");
	assert_eq!(json["data"]["authenticated"], false);
	assert!(json["data"].get("user").is_none());
}

#[test]
fn status_reports_the_persisted_session_with_a_redacted_token() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");
	write_session_file(
		&storage,
		&[
			("auth_token", "access-token-secret-value"),
			("refreshToken", "refresh-token-secret-value"),
			("user", USER_JSON),
		],
	);

	let (success, json, stderr) = run_json(&storage, &["status"]);
	assert!(success, "status failed: {stderr}");
	assert_eq!(json["data"]["authenticated"], true);
	assert_eq!(json["data"]["user"]["email"], "a@b.com");
	assert_eq!(json["data"]["accessTokenPreview"], "access-tok...");

	let stdout = serde_json::to_string(&json).expect("round trip");
	assert!(!stdout.contains("access-token-secret-value"), "full token must not be printed");
}

#[test]
fn partial_session_is_purged_and_reported_absent() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");
	// Refresh token missing: the whole session is invalid.
	write_session_file(&storage, &[("auth_token", "A"), ("user", USER_JSON)]);

	let (success, json, stderr) = run_json(&storage, &["status"]);
	assert!(success, "status failed: {stderr}");
	assert_eq!(json["data"]["authenticated"], false);
	assert!(stored_keys(&storage).is_empty(), "partial session keys should be purged");
}

#[test]
fn local_logout_clears_the_file_and_is_idempotent() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");
	write_session_file(
		&storage,
		&[
			("auth_token", "A"),
			("refreshToken", "R"),
			("user", USER_JSON),
			// Stale entries from an earlier client generation.
			("accessToken", "stale"),
			("userData", "stale"),
		],
	);

	let (success, json, stderr) = run_json(&storage, &["logout", "--local"]);
	assert!(success, "logout failed: {stderr}");
	assert_eq!(json["data"]["transitioned"], true);
	assert_eq!(json["data"]["navigateTo"], "/login");
	assert!(stored_keys(&storage).is_empty(), "logout should clear every session key");

	// Second logout: already signed out, still succeeds, no transition.
	let (success, json, stderr) = run_json(&storage, &["logout", "--local"]);
	assert!(success, "repeat logout failed: {stderr}");
	assert_eq!(json["data"]["transitioned"], false);
}

#[test]
fn json_mode_emits_a_failure_envelope_on_error() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");

	let (success, json, _stderr) = run_json(&storage, &["--profile", "staging", "status"]);
	assert!(!success, "unknown profile must fail");
	assert_eq!(json["ok"], false);
	assert_eq!(json["command"], "status");
	assert!(
		json["error"].as_str().unwrap_or_default().contains("unknown profile"),
		"error message should name the bad profile: {json}"
	);
	assert!(json.get("data").is_none());
}

#[test]
fn status_alias_matches_the_full_command() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let storage = tmp.path().join("session.json");

	let (_, full, _) = run_json(&storage, &["status"]);
	let (_, alias, _) = run_json(&storage, &["st"]);
	assert_eq!(full, alias);
}
