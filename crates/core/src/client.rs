//! Capability provider contract.
//!
//! An [`AuthClient`] supplies the lifecycle hooks a [`Session`](crate::Session)
//! orchestrates. Only [`on_login`](AuthClient::on_login) is mandatory; every
//! other hook has a default that behaves like an absent hook:
//!
//! | Hook | Default |
//! |------|---------|
//! | `on_init` | no persisted tokens (`Ok(None)`) |
//! | `on_refresh` | succeeds without tokens (`Ok(None)`) |
//! | `on_logout` | fails with [`UnsupportedHook::Logout`] |
//! | `on_pre_*` / `on_post_*` | no-op |

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error reported for a hook the client does not implement but the session
/// cannot treat as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UnsupportedHook {
	/// Logging out without a logout hook is reported as a failure.
	#[error("auth client does not implement logout")]
	Logout,
}

/// Hooks that back an authentication session.
///
/// Hooks signal failure by returning `Err`; the session turns that into a
/// `*Failed` event and a `false` outcome, never into an error of its own.
/// Pre and post hooks are infallible notifications.
#[async_trait]
pub trait AuthClient: Send + Sync + 'static {
	/// Token payload. Opaque to the session.
	type Tokens: Clone + Send + Sync + 'static;
	/// Credentials forwarded untouched to [`on_login`](AuthClient::on_login).
	type Credentials: Send + 'static;
	/// Error raised by the fallible hooks.
	type Error: From<UnsupportedHook> + fmt::Debug + fmt::Display + Send + Sync + 'static;

	/// Loads tokens available at startup, e.g. from persistent storage.
	async fn on_init(&self) -> Result<Option<Self::Tokens>, Self::Error> {
		Ok(None)
	}

	/// Runs once an init attempt is over, whatever its outcome.
	async fn on_post_init(&self) {}

	async fn on_pre_login(&self) {}

	/// Exchanges credentials for tokens.
	async fn on_login(&self, credentials: Option<Self::Credentials>) -> Result<Self::Tokens, Self::Error>;

	async fn on_post_login(&self, _success: bool) {}

	async fn on_pre_refresh(&self) {}

	/// Produces fresh tokens.
	///
	/// `current` is the token payload the session holds. `min_validity` is
	/// advisory: implementations may return `current` unchanged when it stays
	/// valid for at least that long.
	async fn on_refresh(
		&self,
		_current: Option<&Self::Tokens>,
		_min_validity: Option<Duration>,
	) -> Result<Option<Self::Tokens>, Self::Error> {
		Ok(None)
	}

	async fn on_post_refresh(&self, _success: bool) {}

	async fn on_pre_logout(&self) {}

	/// Ends the session with the provider.
	async fn on_logout(&self) -> Result<(), Self::Error> {
		Err(UnsupportedHook::Logout.into())
	}

	async fn on_post_logout(&self, _success: bool) {}
}
