//! Session controller.
//!
//! [`Session`] owns the authentication state for one [`AuthClient`] and runs
//! the four lifecycle operations against it:
//!
//! 1. [`init`](Session::init) - load whatever tokens the client already has
//! 2. [`login`](Session::login) - exchange credentials for tokens
//! 3. [`refresh`](Session::refresh) - renew tokens, deduplicating concurrent callers
//! 4. [`logout`](Session::logout) - drop the tokens
//!
//! Every operation replaces the [`SessionState`] at most once, then emits its
//! outcome event, then notifies subscribers. Operations never fail: a hook
//! error becomes a `false` outcome plus a `*Failed` event carrying the error.
//!
//! # Refresh queue
//!
//! Each `refresh` call appends a [`Deferred`] to the queue. The caller that
//! finds itself alone in the queue spawns the physical refresh; the others
//! wait on their deferreds. When the refresh finishes, the whole queue is
//! drained and every deferred resolves to the same outcome. The refresh runs on
//! its own task, so dropping the caller that started it does not strand the
//! callers riding along.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use authflow_protocol::{AuthEventKind, SessionState};
use authflow_runtime::{Deferred, EventChannel, ListenerId};
use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::client::AuthClient;
use crate::event::AuthEvent;
use crate::store::{SubscriberSet, Unsubscribe};

/// Shared, cloneable handle to an authentication session.
///
/// Clones refer to the same session. All methods take `&self`.
pub struct Session<C: AuthClient> {
	pub(crate) inner: Arc<Inner<C>>,
}

pub(crate) struct Inner<C: AuthClient> {
	client: C,
	pub(crate) state: RwLock<Arc<SessionState<C::Tokens>>>,
	refresh_queue: Mutex<Vec<Deferred<bool>>>,
	events: EventChannel<AuthEventKind, AuthEvent<C::Error>>,
	subscribers: Arc<SubscriberSet>,
}

impl<C: AuthClient> Session<C> {
	/// Wraps `client` in a new, uninitialized session.
	pub fn new(client: C) -> Self {
		Self {
			inner: Arc::new(Inner {
				client,
				state: RwLock::new(Arc::new(SessionState::new())),
				refresh_queue: Mutex::new(Vec::new()),
				events: EventChannel::new(),
				subscribers: Arc::new(SubscriberSet::default()),
			}),
		}
	}

	/// Returns the wrapped client.
	pub fn client(&self) -> &C {
		&self.inner.client
	}

	/// Returns the current state.
	///
	/// The same `Arc` is returned until the next transition, so
	/// [`Arc::ptr_eq`] tells whether anything changed.
	pub fn snapshot(&self) -> Arc<SessionState<C::Tokens>> {
		Arc::clone(&self.inner.state.read())
	}

	pub fn is_initialized(&self) -> bool {
		self.inner.state.read().is_initialized
	}

	pub fn is_authenticated(&self) -> bool {
		self.inner.state.read().is_authenticated
	}

	pub fn tokens(&self) -> Option<C::Tokens> {
		self.inner.state.read().tokens.clone()
	}

	/// Number of callers waiting on the refresh in flight (zero when idle).
	pub fn pending_refreshes(&self) -> usize {
		self.inner.refresh_queue.lock().len()
	}

	/// Loads the client's initial tokens.
	///
	/// Emits `initSuccess` or `initFailed`, then runs `on_post_init`. Returns
	/// whether the session is initialized afterwards. A failed init keeps the
	/// previous tokens and authentication flag.
	pub async fn init(&self) -> bool {
		let client = &self.inner.client;

		match client.on_init().await {
			Ok(tokens) => {
				let is_authenticated = tokens.is_some();
				self.replace_state(|_| SessionState {
					is_initialized: true,
					is_authenticated,
					tokens,
				});
				info!(target = "authflow.session", is_authenticated, "session initialized");
				self.emit(AuthEvent::InitSuccess);
			}
			Err(err) => {
				warn!(target = "authflow.session", error = %err, "session init failed");
				self.replace_state(|current| SessionState {
					is_initialized: false,
					..current.clone()
				});
				self.emit(AuthEvent::InitFailed(Arc::new(err)));
			}
		}

		client.on_post_init().await;

		self.is_initialized()
	}

	/// Logs in with `credentials`, passed to the client unchanged.
	///
	/// Returns whether the session is authenticated once `on_post_login` has
	/// run. A failed login clears the tokens.
	pub async fn login(&self, credentials: Option<C::Credentials>) -> bool {
		let client = &self.inner.client;

		self.emit(AuthEvent::LoginStarted);
		client.on_pre_login().await;

		let success = match client.on_login(credentials).await {
			Ok(tokens) => {
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: true,
					tokens: Some(tokens),
				});
				info!(target = "authflow.session", "login succeeded");
				self.emit(AuthEvent::LoginSuccess);
				true
			}
			Err(err) => {
				warn!(target = "authflow.session", error = %err, "login failed");
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: false,
					tokens: None,
				});
				self.emit(AuthEvent::LoginFailed(Arc::new(err)));
				false
			}
		};

		client.on_post_login(success).await;

		self.is_authenticated()
	}

	/// Refreshes the tokens, or joins the refresh already in flight.
	///
	/// `min_validity` is forwarded to [`AuthClient::on_refresh`] as a hint.
	/// Every caller waiting on the same physical refresh gets the same result.
	/// A panicking refresh hook counts as a failure without a `refreshFailed`
	/// event.
	///
	/// # Panics
	///
	/// Panics when called outside a Tokio runtime, since the refresh itself is
	/// spawned onto one.
	pub async fn refresh(&self, min_validity: Option<Duration>) -> bool {
		let deferred = Deferred::new();

		let queued = {
			let mut queue = self.inner.refresh_queue.lock();
			queue.push(deferred.clone());
			queue.len()
		};

		if queued == 1 {
			let session = self.clone();
			tokio::spawn(async move { session.run_refresh(min_validity).await });
		} else {
			debug!(target = "authflow.session", queued, "refresh in flight; waiting for its outcome");
		}

		deferred.wait().await
	}

	/// Logs out.
	///
	/// Clears the tokens when `on_logout` succeeds. A failure, including a
	/// client without a logout hook, leaves the state untouched and is only
	/// visible through the `logoutFailed` event.
	pub async fn logout(&self) {
		let client = &self.inner.client;

		self.emit(AuthEvent::LogoutStarted);
		client.on_pre_logout().await;

		let success = match client.on_logout().await {
			Ok(()) => {
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: false,
					tokens: None,
				});
				info!(target = "authflow.session", "logged out");
				self.emit(AuthEvent::LogoutSuccess);
				true
			}
			Err(err) => {
				warn!(target = "authflow.session", error = %err, "logout failed");
				self.emit(AuthEvent::LogoutFailed(Arc::new(err)));
				false
			}
		};

		client.on_post_logout(success).await;
	}

	/// Registers `listener` for events of `kind`.
	///
	/// Listeners run synchronously on the task performing the operation, in
	/// registration order. A panicking listener is ignored.
	pub fn on<F>(&self, kind: AuthEventKind, listener: F) -> ListenerId
	where
		F: Fn(&AuthEvent<C::Error>) + Send + Sync + 'static,
	{
		self.inner.events.on(kind, listener)
	}

	/// Removes a listener registered with [`on`](Session::on).
	///
	/// Unknown ids are ignored and yield `false`.
	pub fn off(&self, kind: AuthEventKind, id: ListenerId) -> bool {
		self.inner.events.off(kind, id)
	}

	/// Calls `callback` after every state change.
	///
	/// The callback receives nothing; read the new state with
	/// [`snapshot`](Session::snapshot).
	pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
	where
		F: Fn() + Send + Sync + 'static,
	{
		SubscriberSet::subscribe(&self.inner.subscribers, callback)
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.len()
	}

	/// Runs the physical refresh and settles every queued caller.
	///
	/// A panicking refresh hook settles like a failed refresh: tokens are
	/// cleared and `on_post_refresh(false)` runs. No `refreshFailed` event is
	/// emitted in that case, since there is no client error to carry.
	async fn run_refresh(&self, min_validity: Option<Duration>) {
		let outcome = match AssertUnwindSafe(self.physical_refresh(min_validity)).catch_unwind().await {
			Ok(outcome) => outcome,
			Err(_) => {
				warn!(target = "authflow.session", "refresh hook panicked; reporting failure");
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: false,
					tokens: None,
				});
				if AssertUnwindSafe(self.inner.client.on_post_refresh(false)).catch_unwind().await.is_err() {
					warn!(target = "authflow.session", "post-refresh hook panicked");
				}
				false
			}
		};

		let waiters = std::mem::take(&mut *self.inner.refresh_queue.lock());
		debug!(target = "authflow.session", waiters = waiters.len(), outcome, "refresh settled");
		for waiter in waiters {
			waiter.resolve(outcome);
		}
	}

	async fn physical_refresh(&self, min_validity: Option<Duration>) -> bool {
		let client = &self.inner.client;

		self.emit(AuthEvent::RefreshStarted);
		client.on_pre_refresh().await;

		let current = self.snapshot();
		let success = match client.on_refresh(current.tokens(), min_validity).await {
			Ok(tokens) => {
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: true,
					tokens,
				});
				info!(target = "authflow.session", "tokens refreshed");
				self.emit(AuthEvent::RefreshSuccess);
				true
			}
			Err(err) => {
				warn!(target = "authflow.session", error = %err, "token refresh failed");
				self.replace_state(|current| SessionState {
					is_initialized: current.is_initialized,
					is_authenticated: false,
					tokens: None,
				});
				self.emit(AuthEvent::RefreshFailed(Arc::new(err)));
				false
			}
		};

		client.on_post_refresh(success).await;
		success
	}

	/// Swaps in the state computed by `next`, then notifies subscribers.
	fn replace_state<F>(&self, next: F)
	where
		F: FnOnce(&SessionState<C::Tokens>) -> SessionState<C::Tokens>,
	{
		{
			let mut state = self.inner.state.write();
			let replacement = next(&state);
			*state = Arc::new(replacement);
		}
		self.inner.subscribers.notify();
	}

	fn emit(&self, event: AuthEvent<C::Error>) {
		let delivered = self.inner.events.emit(event.kind(), &event);
		debug!(target = "authflow.session", event = event.kind().as_str(), delivered, "event emitted");
	}
}

impl<C: AuthClient> Clone for Session<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<C: AuthClient> fmt::Debug for Session<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.snapshot();
		f.debug_struct("Session")
			.field("is_initialized", &state.is_initialized)
			.field("is_authenticated", &state.is_authenticated)
			.field("has_tokens", &state.tokens.is_some())
			.field("pending_refreshes", &self.pending_refreshes())
			.finish()
	}
}
