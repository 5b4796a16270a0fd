//! `gatepass dashboard`: the authenticated shell with extension logout sync.
//!
//! Runs until the user signs out at the terminal or the extension raises
//! `EXTENSION_LOGOUT`. Either path ends the session exactly once; an
//! extension-initiated logout is not echoed back to the extension.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use gatepass::AppConfig;
use gatepass::bridge::Messenger;
use gatepass::controller::LogoutTrigger;
use gatepass::routes::{self, Route};
use serde_json::json;

use crate::app;
use crate::output::{CommandResult, OutputFormat, print_result};
use crate::relay::ExtensionRelay;

pub async fn run(
	config: &AppConfig,
	storage: &Path,
	format: OutputFormat,
	relay_port: u16,
) -> anyhow::Result<()> {
	let relay = ExtensionRelay::start(relay_port, &config.extension_id).await;
	let messenger = relay.clone().map(|r| r as Arc<dyn Messenger>);

	let controller = app::build_controller(config, storage, messenger)?;
	if let Some(relay) = &relay {
		relay.attach_logout(controller.bridge().logout_handle());
	}

	// Route guard: the dashboard requires a session.
	if routes::resolve(Route::Dashboard, controller.is_authenticated()) != Route::Dashboard {
		println!("Not signed in; redirecting to {}", "gatepass login".cyan());
		return Ok(());
	}

	let user = controller.current_user().context("authenticated session has a user")?;
	println!("{} {}", "Dashboard".bold(), format!("({})", user.email).dimmed());
	println!("  Press Enter to sign out");
	if relay.is_some() {
		println!("  Extension logout is mirrored here");
	}

	let mut extension_logout = controller.bridge().subscribe_logout();

	let stdin = tokio::task::spawn_blocking(|| {
		let mut line = String::new();
		let _ = std::io::stdin().read_line(&mut line);
	});

	let trigger = tokio::select! {
		_ = stdin => LogoutTrigger::User,
		signal = extension_logout.recv() => match signal {
			Some(()) => LogoutTrigger::Extension,
			None => LogoutTrigger::User,
		},
	};
	// Unsubscribe before transitioning so nothing is delivered after teardown.
	drop(extension_logout);

	let outcome = controller.logout(trigger).await;

	match format {
		OutputFormat::Json => {
			let result = CommandResult::success(
				"dashboard",
				json!({
					"trigger": match trigger {
						LogoutTrigger::User => "user",
						LogoutTrigger::Extension => "extension",
					},
					"transitioned": outcome.transitioned,
					"navigateTo": outcome.navigate_to.path(),
				}),
			);
			print_result(&result, format);
		}
		OutputFormat::Text => {
			match trigger {
				LogoutTrigger::User => println!("{}", "Signed out".green()),
				LogoutTrigger::Extension => {
					println!("{}", "Signed out by the extension".yellow());
				}
			}
		}
	}

	Ok(())
}
