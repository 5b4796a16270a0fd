//! Output envelope for command results.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON output
	Json,
}

/// The result envelope returned by all commands in JSON mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
	pub fn success(command: impl Into<String>, data: T) -> Self {
		Self { ok: true, command: command.into(), data: Some(data), error: None }
	}

	pub fn failure(command: impl Into<String>, error: impl Into<String>) -> Self {
		Self { ok: false, command: command.into(), data: None, error: Some(error.into()) }
	}
}

/// Prints a result in the requested format.
///
/// Commands that want richer text output print it themselves and only route
/// through the envelope in JSON mode.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			println!(
				"{}",
				serde_json::to_string(result).expect("command result is always serializable")
			);
		}
		OutputFormat::Text => {
			if let Some(data) = &result.data {
				println!(
					"{}",
					serde_json::to_string_pretty(data).expect("command data is always serializable")
				);
			}
			if let Some(error) = &result.error {
				eprintln!("Error: {error}");
			}
		}
	}
}
