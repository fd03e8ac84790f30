use std::io::{self, Write};
use std::time::Instant;

use serde::Serialize;

use crate::output::format::OutputFormat;
use crate::output::model::{CommandError, CommandResult, ErrorCode, SCHEMA_VERSION};

/// Builder for constructing command results.
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	events: Vec<String>,
	start_time: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			events: Vec::new(),
			start_time: Instant::now(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
		});
		self
	}

	pub fn events(mut self, events: Vec<String>) -> Self {
		self.events = events;
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: SCHEMA_VERSION,
			ok: self.error.is_none(),
			command: self.command,
			data: self.data,
			error: self.error,
			events: self.events,
			duration_ms: Some(self.start_time.elapsed().as_millis() as u64),
		}
	}
}

/// Print a command result to stdout in the specified format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if let Some(ref data) = result.data {
		match serde_json::to_value(data) {
			Ok(serde_json::Value::Object(fields)) => {
				for (key, value) in fields {
					match value {
						serde_json::Value::String(text) => {
							let _ = writeln!(stdout, "{key}: {text}");
						}
						other => {
							let _ = writeln!(stdout, "{key}: {other}");
						}
					}
				}
			}
			Ok(serde_json::Value::String(text)) => {
				let _ = writeln!(stdout, "{text}");
			}
			Ok(other) => {
				let _ = writeln!(stdout, "{other}");
			}
			Err(_) => {}
		}
	}

	if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::output::SessionReport;

	fn report() -> SessionReport {
		SessionReport {
			is_initialized: true,
			is_authenticated: true,
			expires_at: None,
			has_refresh_token: false,
		}
	}

	#[test]
	fn ok_without_error() {
		let result = ResultBuilder::new("status").data(report()).build();

		assert!(result.ok);
		assert_eq!(result.command, "status");
		assert_eq!(result.schema_version, SCHEMA_VERSION);
		assert!(result.duration_ms.is_some());
	}

	#[test]
	fn error_marks_failure_but_keeps_data() {
		let result = ResultBuilder::new("login")
			.data(report())
			.error(ErrorCode::LoginFailed, "server responded 401: invalid credentials")
			.events(vec!["loginStarted".into(), "loginFailed".into()])
			.build();

		assert!(!result.ok);
		assert!(result.data.is_some());

		let json = serde_json::to_value(&result).unwrap();
		assert_eq!(json["error"]["code"], "LOGIN_FAILED");
		assert_eq!(json["data"]["isAuthenticated"], true);
		assert_eq!(json["events"][1], "loginFailed");
		assert!(json.get("expiresAt").is_none());
	}
}
