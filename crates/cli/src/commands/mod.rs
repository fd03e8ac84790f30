//! Command dispatch.
//!
//! Every command builds a fresh [`Session`] around an [`HttpAuthClient`],
//! initializes it from the token file, then runs one lifecycle operation.

mod events;
mod lifecycle;
mod request;

use std::time::Duration;

use authflow::Session;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::provider::{Credentials, HttpAuthClient};
use crate::token_store::TokenStore;

pub(crate) use events::EventLog;

pub(crate) type HttpSession = Session<HttpAuthClient>;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let token_file = match cli.token_file {
		Some(path) => path,
		None => TokenStore::default_path().ok_or(CliError::NoConfigDir)?,
	};
	let session = Session::new(HttpAuthClient::new(cli.base_url, TokenStore::new(token_file)));
	let log = EventLog::attach(&session, cli.trace_events);
	let command = cli.command.name();

	let initialized = session.init().await;

	match cli.command {
		Commands::Status => lifecycle::status(&session, &log, initialized, cli.format),
		Commands::Login { username, password } => {
			let credentials = match (username, password) {
				(Some(username), Some(password)) => Some(Credentials { username, password }),
				_ => None,
			};
			lifecycle::login(&session, &log, credentials, cli.format).await
		}
		Commands::Refresh { min_validity } => lifecycle::refresh(&session, &log, min_validity.map(Duration::from_secs), cli.format).await,
		Commands::Logout => lifecycle::logout(&session, &log, cli.format).await,
		Commands::Get { path, min_validity } => {
			request::get(&session, &log, command, &path, min_validity.map(Duration::from_secs), cli.format).await
		}
	}
}
