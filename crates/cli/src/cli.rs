use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "authflow")]
#[command(about = "Token session client for HTTP auth APIs")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Base URL of the auth API
	#[arg(long, global = true, env = "AUTHFLOW_BASE_URL", value_name = "URL")]
	pub base_url: Option<String>,

	/// File holding the persisted tokens
	#[arg(long, global = true, env = "AUTHFLOW_TOKEN_FILE", value_name = "FILE")]
	pub token_file: Option<PathBuf>,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Print every session event to stderr as it fires
	#[arg(long, global = true)]
	pub trace_events: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Show the persisted session
	Status,

	/// Exchange credentials for tokens
	Login {
		#[arg(short, long)]
		username: Option<String>,
		#[arg(short, long, env = "AUTHFLOW_PASSWORD", hide_env_values = true)]
		password: Option<String>,
	},

	/// Renew the tokens unless they stay valid long enough
	Refresh {
		/// Seconds the access token must remain valid to skip the refresh
		#[arg(long, value_name = "SECS")]
		min_validity: Option<u64>,
	},

	/// Forget the persisted tokens
	Logout,

	/// Send an authorized GET request, refreshing first when needed
	Get {
		/// Path relative to the base URL
		path: String,
		/// Seconds the access token must remain valid to skip the refresh
		#[arg(long, value_name = "SECS")]
		min_validity: Option<u64>,
	},
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Status => "status",
			Commands::Login { .. } => "login",
			Commands::Refresh { .. } => "refresh",
			Commands::Logout => "logout",
			Commands::Get { .. } => "get",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_login_with_global_flags_after_subcommand() {
		let cli = Cli::try_parse_from([
			"authflow", "login", "-u", "ada", "-p", "secret", "--base-url", "http://localhost:9000", "-f", "json",
		])
		.unwrap();

		assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
		assert_eq!(cli.format, OutputFormat::Json);
		match cli.command {
			Commands::Login { username, password } => {
				assert_eq!(username.as_deref(), Some("ada"));
				assert_eq!(password.as_deref(), Some("secret"));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn counts_verbosity() {
		let cli = Cli::try_parse_from(["authflow", "-vv", "status"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.command.name(), "status");
	}

	#[test]
	fn parses_get_with_min_validity() {
		let cli = Cli::try_parse_from(["authflow", "get", "/profile", "--min-validity", "30"]).unwrap();
		match cli.command {
			Commands::Get { path, min_validity } => {
				assert_eq!(path, "/profile");
				assert_eq!(min_validity, Some(30));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}
}
