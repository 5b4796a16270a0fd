//! `gatepass status`: inspect the persisted session.

use std::path::Path;

use colored::Colorize;
use gatepass::AppConfig;
use serde_json::json;

use crate::app;
use crate::output::{CommandResult, OutputFormat, print_result};

pub fn run(config: &AppConfig, storage: &Path, format: OutputFormat) -> anyhow::Result<()> {
	let store = app::build_store(storage);
	let session = store.load();

	match format {
		OutputFormat::Json => {
			let data = match &session {
				Some(session) => json!({
					"authenticated": true,
					"user": session.user,
					"accessTokenPreview": session.access_token_preview(),
				}),
				None => json!({ "authenticated": false }),
			};
			print_result(&CommandResult::success("status", data), format);
		}
		OutputFormat::Text => match &session {
			Some(session) => {
				println!("{} {}", "Authenticated:".bold(), "yes".green());
				println!("  User:   {} <{}>", session.user.name, session.user.email);
				println!("  Token:  {}", session.access_token_preview());
				println!("  API:    {}", config.api_url);
			}
			None => {
				println!("{} {}", "Authenticated:".bold(), "no".red());
				println!("  Run {} to sign in", "gatepass login".cyan());
			}
		},
	}

	Ok(())
}
