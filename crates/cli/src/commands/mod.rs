//! Command dispatch.

use crate::app;
use crate::cli::{Cli, Commands};
use crate::output::{CommandResult, OutputFormat, print_result};

mod dashboard;
mod login;
mod logout;
mod status;

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
	let format = cli.format;
	let command = command_name(&cli.command);

	let outcome = run(cli).await;
	if let Err(err) = &outcome {
		// In JSON mode callers expect an envelope even on failure; the exit
		// code still comes from main.
		if format == OutputFormat::Json {
			let result = CommandResult::<serde_json::Value>::failure(command, err.to_string());
			print_result(&result, format);
		}
	}
	outcome
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let config = app::build_config(&cli)?;
	let storage = app::storage_path(&cli)?;
	let format = cli.format;

	match cli.command {
		Commands::Login { port, relay_port, no_extension } => {
			login::run(&config, &storage, format, port, relay_port, no_extension).await
		}
		Commands::Logout { local } => logout::run(&config, &storage, format, local).await,
		Commands::Status => status::run(&config, &storage, format),
		Commands::Dashboard { relay_port } => {
			dashboard::run(&config, &storage, format, relay_port).await
		}
	}
}

fn command_name(command: &Commands) -> &'static str {
	match command {
		Commands::Login { .. } => "login",
		Commands::Logout { .. } => "logout",
		Commands::Status => "status",
		Commands::Dashboard { .. } => "dashboard",
	}
}

/// Human-readable description of an extension sync outcome.
fn sync_message(sync: gatepass::bridge::SyncStatus) -> &'static str {
	match sync {
		gatepass::bridge::SyncStatus::Delivered => "Extension session synced",
		gatepass::bridge::SyncStatus::Unavailable => "Extension not connected; skipped sync",
		gatepass::bridge::SyncStatus::Failed => "Extension sync failed; session is still valid",
	}
}
