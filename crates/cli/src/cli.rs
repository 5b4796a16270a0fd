use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gatepass")]
#[command(about = "Gatepass - sign-in and session sync for the Comment Assistant extension")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Deployment profile (development or production)
	#[arg(long, global = true, default_value = "production")]
	pub profile: String,

	/// Override the auth backend base URL
	#[arg(long, global = true, value_name = "URL", value_parser = parse_base_url)]
	pub api_url: Option<String>,

	/// Session storage file (defaults to the user config dir)
	#[arg(long, global = true, value_name = "FILE")]
	pub storage: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in with Google and sync the session to the extension
	Login {
		/// Port for the loopback sign-in page (0 picks a free port)
		#[arg(long, default_value = "5173")]
		port: u16,

		/// Port for the extension relay
		#[arg(long, default_value = "8787")]
		relay_port: u16,

		/// Skip the extension relay entirely
		#[arg(long)]
		no_extension: bool,
	},

	/// End the current session
	Logout {
		/// Skip the backend logout notification
		#[arg(long)]
		local: bool,
	},

	/// Show the current session state
	#[command(alias = "st")]
	Status,

	/// Run the authenticated dashboard shell with extension logout sync
	#[command(alias = "dash")]
	Dashboard {
		/// Port for the extension relay
		#[arg(long, default_value = "8787")]
		relay_port: u16,
	},
}

/// Validates and normalizes a base URL flag (no trailing slash).
fn parse_base_url(raw: &str) -> Result<String, String> {
	let parsed = url::Url::parse(raw).map_err(|e| format!("invalid URL: {e}"))?;
	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(format!("unsupported scheme: {}", parsed.scheme()));
	}
	Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_login_defaults() {
		let cli = Cli::try_parse_from(["gatepass", "login"]).unwrap();
		match cli.command {
			Commands::Login { port, relay_port, no_extension } => {
				assert_eq!(port, 5173);
				assert_eq!(relay_port, 8787);
				assert!(!no_extension);
			}
			_ => panic!("Expected Login command"),
		}
	}

	#[test]
	fn parse_logout_local_flag() {
		let cli = Cli::try_parse_from(["gatepass", "logout", "--local"]).unwrap();
		match cli.command {
			Commands::Logout { local } => assert!(local),
			_ => panic!("Expected Logout command"),
		}
	}

	#[test]
	fn status_alias_parses() {
		let cli = Cli::try_parse_from(["gatepass", "st"]).unwrap();
		assert!(matches!(cli.command, Commands::Status));
	}

	#[test]
	fn api_url_flag_is_validated_and_normalized() {
		let cli =
			Cli::try_parse_from(["gatepass", "--api-url", "http://localhost:3001/", "status"])
				.unwrap();
		assert_eq!(cli.api_url.as_deref(), Some("http://localhost:3001"));

		assert!(Cli::try_parse_from(["gatepass", "--api-url", "not a url", "status"]).is_err());
		assert!(Cli::try_parse_from(["gatepass", "--api-url", "ftp://x", "status"]).is_err());
	}

	#[test]
	fn verbose_flag_short_and_long() {
		let cli = Cli::try_parse_from(["gatepass", "-v", "status"]).unwrap();
		assert_eq!(cli.verbose, 1);

		let cli = Cli::try_parse_from(["gatepass", "-vv", "status"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn invalid_command_fails() {
		assert!(Cli::try_parse_from(["gatepass", "unknown-command"]).is_err());
	}
}
