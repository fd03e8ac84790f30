use std::time::Duration;

use authflow::{AuthEventKind, Operation};

use super::{EventLog, HttpSession};
use crate::error::{CliError, Result};
use crate::output::{ErrorCode, OutputFormat, ResultBuilder, SessionReport, print_result};
use crate::provider::Credentials;

pub(super) fn status(session: &HttpSession, log: &EventLog, initialized: bool, format: OutputFormat) -> Result<()> {
	finish("status", session, log, (!initialized).then_some((ErrorCode::InitFailed, Operation::Init)), format)
}

pub(super) async fn login(session: &HttpSession, log: &EventLog, credentials: Option<Credentials>, format: OutputFormat) -> Result<()> {
	let authenticated = session.login(credentials).await;
	finish("login", session, log, (!authenticated).then_some((ErrorCode::LoginFailed, Operation::Login)), format)
}

pub(super) async fn refresh(session: &HttpSession, log: &EventLog, min_validity: Option<Duration>, format: OutputFormat) -> Result<()> {
	let refreshed = session.refresh(min_validity).await;
	finish("refresh", session, log, (!refreshed).then_some((ErrorCode::RefreshFailed, Operation::Refresh)), format)
}

pub(super) async fn logout(session: &HttpSession, log: &EventLog, format: OutputFormat) -> Result<()> {
	session.logout().await;
	let failed = log.saw(AuthEventKind::LogoutFailed);
	finish("logout", session, log, failed.then_some((ErrorCode::LogoutFailed, Operation::Logout)), format)
}

pub(super) fn report(session: &HttpSession) -> SessionReport {
	let state = session.snapshot();
	SessionReport {
		is_initialized: state.is_initialized,
		is_authenticated: state.is_authenticated,
		expires_at: state.tokens().and_then(|tokens| tokens.expires_at),
		has_refresh_token: state.tokens().is_some_and(|tokens| tokens.refresh_token.is_some()),
	}
}

fn finish(command: &str, session: &HttpSession, log: &EventLog, failure: Option<(ErrorCode, Operation)>, format: OutputFormat) -> Result<()> {
	let mut builder = ResultBuilder::new(command).data(report(session)).events(log.names());
	if let Some((code, _)) = failure {
		builder = builder.error(code, log.last_error());
	}
	print_result(&builder.build(), format);

	match failure {
		Some((_, operation)) => Err(CliError::OperationFailed(operation)),
		None => Ok(()),
	}
}
