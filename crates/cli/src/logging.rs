//! Logging initialization for the CLI.

use tracing_subscriber::EnvFilter;

/// Initializes tracing with verbosity from repeated `-v` flags.
///
/// `RUST_LOG` wins when set; otherwise `-v` maps to info and `-vv` to debug
/// for the gatepass targets. Logs go to stderr so command output stays
/// machine-readable.
pub fn init_logging(verbose: u8) {
	let default = match verbose {
		0 => "warn",
		1 => "gatepass=info,gatepass_cli=info",
		_ => "gatepass=debug,gatepass_cli=debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
