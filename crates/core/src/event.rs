//! Lifecycle events delivered to session listeners.

use std::fmt;
use std::sync::Arc;

use authflow_protocol::AuthEventKind;

/// A lifecycle event, carrying the hook error for the `*Failed` kinds.
///
/// Errors are shared behind an `Arc` so listeners can keep them past the
/// callback without requiring `E: Clone`.
pub enum AuthEvent<E> {
	InitSuccess,
	InitFailed(Arc<E>),
	LoginStarted,
	LoginSuccess,
	LoginFailed(Arc<E>),
	RefreshStarted,
	RefreshSuccess,
	RefreshFailed(Arc<E>),
	LogoutStarted,
	LogoutSuccess,
	LogoutFailed(Arc<E>),
}

impl<E> AuthEvent<E> {
	pub fn kind(&self) -> AuthEventKind {
		match self {
			AuthEvent::InitSuccess => AuthEventKind::InitSuccess,
			AuthEvent::InitFailed(_) => AuthEventKind::InitFailed,
			AuthEvent::LoginStarted => AuthEventKind::LoginStarted,
			AuthEvent::LoginSuccess => AuthEventKind::LoginSuccess,
			AuthEvent::LoginFailed(_) => AuthEventKind::LoginFailed,
			AuthEvent::RefreshStarted => AuthEventKind::RefreshStarted,
			AuthEvent::RefreshSuccess => AuthEventKind::RefreshSuccess,
			AuthEvent::RefreshFailed(_) => AuthEventKind::RefreshFailed,
			AuthEvent::LogoutStarted => AuthEventKind::LogoutStarted,
			AuthEvent::LogoutSuccess => AuthEventKind::LogoutSuccess,
			AuthEvent::LogoutFailed(_) => AuthEventKind::LogoutFailed,
		}
	}

	/// Hook error carried by a `*Failed` event.
	pub fn error(&self) -> Option<&E> {
		self.shared_error().map(|err| &**err)
	}

	pub fn shared_error(&self) -> Option<&Arc<E>> {
		match self {
			AuthEvent::InitFailed(err)
			| AuthEvent::LoginFailed(err)
			| AuthEvent::RefreshFailed(err)
			| AuthEvent::LogoutFailed(err) => Some(err),
			_ => None,
		}
	}
}

impl<E> Clone for AuthEvent<E> {
	fn clone(&self) -> Self {
		match self {
			AuthEvent::InitSuccess => AuthEvent::InitSuccess,
			AuthEvent::InitFailed(err) => AuthEvent::InitFailed(Arc::clone(err)),
			AuthEvent::LoginStarted => AuthEvent::LoginStarted,
			AuthEvent::LoginSuccess => AuthEvent::LoginSuccess,
			AuthEvent::LoginFailed(err) => AuthEvent::LoginFailed(Arc::clone(err)),
			AuthEvent::RefreshStarted => AuthEvent::RefreshStarted,
			AuthEvent::RefreshSuccess => AuthEvent::RefreshSuccess,
			AuthEvent::RefreshFailed(err) => AuthEvent::RefreshFailed(Arc::clone(err)),
			AuthEvent::LogoutStarted => AuthEvent::LogoutStarted,
			AuthEvent::LogoutSuccess => AuthEvent::LogoutSuccess,
			AuthEvent::LogoutFailed(err) => AuthEvent::LogoutFailed(Arc::clone(err)),
		}
	}
}

impl<E: fmt::Debug> fmt::Debug for AuthEvent<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.error() {
			Some(err) => f.debug_tuple(self.kind().as_str()).field(err).finish(),
			None => f.write_str(self.kind().as_str()),
		}
	}
}

impl<E: fmt::Display> fmt::Display for AuthEvent<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.error() {
			Some(err) => write!(f, "{}: {err}", self.kind()),
			None => write!(f, "{}", self.kind()),
		}
	}
}
