//! Settable one-shot result shared by any number of waiters.
//!
//! Unlike `tokio::sync::oneshot`, a [`Deferred`] can be cloned and awaited by
//! several independent tasks, and it can be resolved from a handle that is
//! not itself waiting.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::sync::Notify;
use tracing::trace;

/// A result that is resolved exactly once and awaited any number of times.
///
/// Clones share the same slot. The first [`resolve`](Deferred::resolve) wins;
/// later calls are ignored and report `false`.
pub struct Deferred<T> {
	inner: Arc<Inner<T>>,
}

struct Inner<T> {
	value: OnceLock<T>,
	notify: Notify,
}

impl<T> Deferred<T> {
	/// Creates an unresolved deferred.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				value: OnceLock::new(),
				notify: Notify::new(),
			}),
		}
	}

	/// Stores `value` and wakes every waiter.
	///
	/// Returns `false` if the deferred was already resolved; the stored value
	/// is left untouched in that case.
	pub fn resolve(&self, value: T) -> bool {
		if self.inner.value.set(value).is_err() {
			trace!(target = "authflow", "deferred already resolved; ignoring value");
			return false;
		}
		self.inner.notify.notify_waiters();
		true
	}

	pub fn is_resolved(&self) -> bool {
		self.inner.value.get().is_some()
	}

	/// Returns the value without waiting, if it has been resolved.
	pub fn get(&self) -> Option<&T> {
		self.inner.value.get()
	}
}

impl<T: Clone> Deferred<T> {
	/// Waits until the deferred is resolved and returns a copy of the value.
	pub async fn wait(&self) -> T {
		loop {
			let notified = self.inner.notify.notified();
			tokio::pin!(notified);
			// Register before checking so a resolve between the check and the
			// await still wakes us.
			notified.as_mut().enable();

			if let Some(value) = self.inner.value.get() {
				return value.clone();
			}

			notified.await;
		}
	}
}

impl<T> Clone for Deferred<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Default for Deferred<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Deferred").field("value", &self.inner.value.get()).finish()
	}
}
