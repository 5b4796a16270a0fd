//! `gatepass logout`: end the current session.

use std::path::Path;

use colored::Colorize;
use gatepass::AppConfig;
use gatepass::controller::LogoutTrigger;
use serde_json::json;

use crate::app;
use crate::output::{CommandResult, OutputFormat, print_result};

pub async fn run(
	config: &AppConfig,
	storage: &Path,
	format: OutputFormat,
	local: bool,
) -> anyhow::Result<()> {
	let controller = app::build_controller(config, storage, None)?;

	let outcome = if local {
		controller.logout_local(LogoutTrigger::User).await
	} else {
		controller.logout(LogoutTrigger::User).await
	};

	match format {
		OutputFormat::Json => {
			let result = CommandResult::success(
				"logout",
				json!({
					"transitioned": outcome.transitioned,
					"navigateTo": outcome.navigate_to.path(),
				}),
			);
			print_result(&result, format);
		}
		OutputFormat::Text => {
			if outcome.transitioned {
				println!("{}", "Signed out".green());
			} else {
				println!("Not signed in; nothing to do");
			}
		}
	}

	Ok(())
}
