use serde::{Deserialize, Serialize};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T> {
	pub schema_version: u32,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub events: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	InitFailed,
	LoginFailed,
	RefreshFailed,
	LogoutFailed,
	RequestFailed,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::InitFailed => write!(f, "INIT_FAILED"),
			ErrorCode::LoginFailed => write!(f, "LOGIN_FAILED"),
			ErrorCode::RefreshFailed => write!(f, "REFRESH_FAILED"),
			ErrorCode::LogoutFailed => write!(f, "LOGOUT_FAILED"),
			ErrorCode::RequestFailed => write!(f, "REQUEST_FAILED"),
		}
	}
}

/// Session summary shared by the lifecycle commands.
///
/// Token values are never printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
	pub is_initialized: bool,
	pub is_authenticated: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<u64>,
	pub has_refresh_token: bool,
}

/// Response of an authorized request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReport {
	pub path: String,
	pub body: serde_json::Value,
}
