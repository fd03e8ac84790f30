//! Session state record published by the controller.

use serde::{Deserialize, Serialize};

/// Snapshot of an authentication session.
///
/// The controller replaces this record wholesale on every transition and hands
/// it out behind an `Arc`, so readers never observe a half-updated value.
/// `tokens` is `None` when the session holds no token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState<T> {
	pub is_initialized: bool,
	pub is_authenticated: bool,
	pub tokens: Option<T>,
}

impl<T> SessionState<T> {
	/// State of a session that has not been initialized yet.
	pub const fn new() -> Self {
		Self {
			is_initialized: false,
			is_authenticated: false,
			tokens: None,
		}
	}

	/// Returns the token payload, if any.
	pub fn tokens(&self) -> Option<&T> {
		self.tokens.as_ref()
	}
}

impl<T> Default for SessionState<T> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
	struct Token {
		token: String,
	}

	#[test]
	fn default_state_is_blank() {
		let state = SessionState::<Token>::default();
		assert!(!state.is_initialized);
		assert!(!state.is_authenticated);
		assert!(state.tokens().is_none());
	}

	#[test]
	fn serializes_with_camel_case_fields() {
		let state = SessionState {
			is_initialized: true,
			is_authenticated: true,
			tokens: Some(Token { token: "t1".into() }),
		};

		let value = serde_json::to_value(&state).unwrap();
		assert_eq!(
			value,
			json!({
				"isInitialized": true,
				"isAuthenticated": true,
				"tokens": { "token": "t1" }
			})
		);
	}

	#[test]
	fn missing_tokens_deserialize_as_none() {
		let state: SessionState<Token> = serde_json::from_value(json!({
			"isInitialized": true,
			"isAuthenticated": false
		}))
		.unwrap();
		assert!(state.is_initialized);
		assert_eq!(state.tokens, None);
	}
}
