//! Lifecycle event names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
	Init,
	Login,
	Refresh,
	Logout,
}

impl Operation {
	pub fn as_str(self) -> &'static str {
		match self {
			Operation::Init => "init",
			Operation::Login => "login",
			Operation::Refresh => "refresh",
			Operation::Logout => "logout",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of lifecycle event emitted by the session controller.
///
/// Init has no `Started` variant: initialization cannot be observed (or
/// vetoed) before it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthEventKind {
	InitSuccess,
	InitFailed,
	LoginStarted,
	LoginSuccess,
	LoginFailed,
	RefreshStarted,
	RefreshSuccess,
	RefreshFailed,
	LogoutStarted,
	LogoutSuccess,
	LogoutFailed,
}

impl AuthEventKind {
	/// Every event kind, grouped by operation.
	pub const ALL: [AuthEventKind; 11] = [
		AuthEventKind::InitSuccess,
		AuthEventKind::InitFailed,
		AuthEventKind::LoginStarted,
		AuthEventKind::LoginSuccess,
		AuthEventKind::LoginFailed,
		AuthEventKind::RefreshStarted,
		AuthEventKind::RefreshSuccess,
		AuthEventKind::RefreshFailed,
		AuthEventKind::LogoutStarted,
		AuthEventKind::LogoutSuccess,
		AuthEventKind::LogoutFailed,
	];

	/// Event name as observers know it (`"loginSuccess"`, ...).
	pub fn as_str(self) -> &'static str {
		match self {
			AuthEventKind::InitSuccess => "initSuccess",
			AuthEventKind::InitFailed => "initFailed",
			AuthEventKind::LoginStarted => "loginStarted",
			AuthEventKind::LoginSuccess => "loginSuccess",
			AuthEventKind::LoginFailed => "loginFailed",
			AuthEventKind::RefreshStarted => "refreshStarted",
			AuthEventKind::RefreshSuccess => "refreshSuccess",
			AuthEventKind::RefreshFailed => "refreshFailed",
			AuthEventKind::LogoutStarted => "logoutStarted",
			AuthEventKind::LogoutSuccess => "logoutSuccess",
			AuthEventKind::LogoutFailed => "logoutFailed",
		}
	}

	pub fn operation(self) -> Operation {
		match self {
			AuthEventKind::InitSuccess | AuthEventKind::InitFailed => Operation::Init,
			AuthEventKind::LoginStarted | AuthEventKind::LoginSuccess | AuthEventKind::LoginFailed => Operation::Login,
			AuthEventKind::RefreshStarted | AuthEventKind::RefreshSuccess | AuthEventKind::RefreshFailed => Operation::Refresh,
			AuthEventKind::LogoutStarted | AuthEventKind::LogoutSuccess | AuthEventKind::LogoutFailed => Operation::Logout,
		}
	}

	/// Returns `true` for the `*Failed` kinds, which carry an error payload.
	pub fn is_failure(self) -> bool {
		matches!(
			self,
			AuthEventKind::InitFailed | AuthEventKind::LoginFailed | AuthEventKind::RefreshFailed | AuthEventKind::LogoutFailed
		)
	}
}

impl fmt::Display for AuthEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AuthEventKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AuthEventKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| format!("unknown event: {s}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_round_trip_through_from_str() {
		for kind in AuthEventKind::ALL {
			assert_eq!(kind.as_str().parse::<AuthEventKind>(), Ok(kind));
		}
		assert!("loginStart".parse::<AuthEventKind>().is_err());
	}

	#[test]
	fn serde_name_matches_display() {
		let value = serde_json::to_value(AuthEventKind::RefreshFailed).unwrap();
		assert_eq!(value, serde_json::json!("refreshFailed"));
		assert_eq!(AuthEventKind::RefreshFailed.to_string(), "refreshFailed");
	}

	#[test]
	fn init_has_no_started_event() {
		let init_kinds: Vec<_> = AuthEventKind::ALL
			.into_iter()
			.filter(|kind| kind.operation() == Operation::Init)
			.collect();
		assert_eq!(init_kinds, vec![AuthEventKind::InitSuccess, AuthEventKind::InitFailed]);
	}

	#[test]
	fn only_failed_kinds_are_failures() {
		let failures: Vec<_> = AuthEventKind::ALL.into_iter().filter(|kind| kind.is_failure()).collect();
		assert_eq!(failures.len(), 4);
		assert!(failures.iter().all(|kind| kind.as_str().ends_with("Failed")));
	}
}
