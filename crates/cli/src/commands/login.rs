//! `gatepass login`: Google sign-in and session establishment.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use gatepass::AppConfig;
use gatepass::bridge::Messenger;
use gatepass::routes::{self, Route};
use gatepass::widget::IdentityAdapter;
use serde_json::json;

use crate::output::{CommandResult, OutputFormat, print_result};
use crate::relay::ExtensionRelay;
use crate::signin::SignInHost;
use crate::{app, commands};

pub async fn run(
	config: &AppConfig,
	storage: &Path,
	format: OutputFormat,
	port: u16,
	relay_port: u16,
	no_extension: bool,
) -> anyhow::Result<()> {
	let relay = if no_extension {
		None
	} else {
		ExtensionRelay::start(relay_port, &config.extension_id).await
	};
	let messenger = relay.clone().map(|r| r as Arc<dyn Messenger>);

	let controller = app::build_controller(config, storage, messenger)?;
	if let Some(relay) = &relay {
		relay.attach_logout(controller.bridge().logout_handle());
	}

	// Reverse guard: the sign-in entry redirects when already authenticated.
	if routes::resolve(Route::Login, controller.is_authenticated()) == Route::Dashboard {
		let user = controller.current_user().context("authenticated session has a user")?;
		match format {
			OutputFormat::Json => {
				let result = CommandResult::success(
					"login",
					json!({ "alreadyAuthenticated": true, "user": user }),
				);
				print_result(&result, format);
			}
			OutputFormat::Text => {
				println!("Already signed in as {}", user.email.bold());
				println!("Run {} first to switch accounts", "gatepass logout".cyan());
			}
		}
		return Ok(());
	}

	let host = SignInHost::start(port).await?;
	let mut adapter = IdentityAdapter::new(host.clone(), config);
	let mut credentials = adapter.bind().await?;

	if format == OutputFormat::Text {
		println!("{}", "Sign in with Google".bold());
		println!("  Open {} in your browser", host.url().cyan());
		if let Some(relay) = &relay {
			println!("  Extension relay on port {}", relay.port());
		} else {
			println!("  Extension sync disabled");
		}
		println!("  Waiting for sign-in...");
	}

	let credential = credentials.next().await.context("sign-in page closed before completion")?;
	let outcome = controller.login(credential).await?;

	match format {
		OutputFormat::Json => {
			let result = CommandResult::success(
				"login",
				json!({
					"user": outcome.user,
					"sync": outcome.sync,
					"navigateTo": outcome.navigate_to.path(),
				}),
			);
			print_result(&result, format);
		}
		OutputFormat::Text => {
			println!("{} {}", "Signed in as".green(), outcome.user.email.bold());
			println!("{}", commands::sync_message(outcome.sync));
		}
	}

	Ok(())
}
