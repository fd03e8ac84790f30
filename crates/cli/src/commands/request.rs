use std::time::Duration;

use authflow::Operation;
use serde_json::Value;

use super::{EventLog, HttpSession};
use crate::error::{CliError, Result};
use crate::output::{ErrorCode, OutputFormat, ResponseReport, ResultBuilder, print_result};
use crate::provider::ProviderError;

/// Refreshes when the access token would expire within `min_validity`, then
/// sends `GET path` with the resulting access token.
pub(super) async fn get(
	session: &HttpSession,
	log: &EventLog,
	command: &str,
	path: &str,
	min_validity: Option<Duration>,
	format: OutputFormat,
) -> Result<()> {
	let builder = ResultBuilder::<ResponseReport>::new(command);

	if !session.refresh(min_validity).await {
		let result = builder.error(ErrorCode::RefreshFailed, log.last_error()).events(log.names()).build();
		print_result(&result, format);
		return Err(CliError::OperationFailed(Operation::Refresh));
	}

	let outcome = match session.tokens() {
		Some(tokens) => session.client().get(path, &tokens).await,
		None => Err(ProviderError::NotAuthenticated),
	};

	let body = match outcome {
		Ok(body) => body,
		Err(err) => {
			let result = builder.error(ErrorCode::RequestFailed, err.to_string()).events(log.names()).build();
			print_result(&result, format);
			return Err(err.into());
		}
	};

	if format == OutputFormat::Text {
		println!("{body}");
		return Ok(());
	}

	let body = match serde_json::from_str(&body) {
		Ok(json) => json,
		Err(_) => Value::String(body),
	};
	let result = builder
		.data(ResponseReport {
			path: path.to_string(),
			body,
		})
		.events(log.names())
		.build();
	print_result(&result, format);
	Ok(())
}
