//! Subscriber set behind [`Session::subscribe`](crate::Session::subscribe).
//!
//! Subscribers are zero-argument callbacks. They are told *that* the session
//! changed and pull the new value with
//! [`Session::snapshot`](crate::Session::snapshot).

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use authflow_runtime::isolate;
use parking_lot::Mutex;

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub(crate) struct SubscriberSet {
	next_id: AtomicU64,
	callbacks: Mutex<HashMap<u64, Callback>>,
}

impl SubscriberSet {
	pub(crate) fn subscribe<F>(set: &Arc<Self>, callback: F) -> Unsubscribe
	where
		F: Fn() + Send + Sync + 'static,
	{
		let id = set.next_id.fetch_add(1, Ordering::Relaxed);
		set.callbacks.lock().insert(id, Arc::new(callback));
		Unsubscribe {
			id,
			set: Arc::downgrade(set),
		}
	}

	fn remove(&self, id: u64) -> bool {
		self.callbacks.lock().remove(&id).is_some()
	}

	pub(crate) fn len(&self) -> usize {
		self.callbacks.lock().len()
	}

	/// Invokes every callback, in no particular order, outside the set's lock.
	pub(crate) fn notify(&self) {
		let callbacks: Vec<Callback> = self.callbacks.lock().values().cloned().collect();
		for callback in callbacks {
			isolate(|| callback());
		}
	}
}

/// Handle returned by [`Session::subscribe`](crate::Session::subscribe).
///
/// Dropping the handle keeps the subscription alive; call
/// [`unsubscribe`](Unsubscribe::unsubscribe) to remove it.
pub struct Unsubscribe {
	id: u64,
	set: Weak<SubscriberSet>,
}

impl Unsubscribe {
	/// Removes the callback. Returns `true` only for the call that removed it.
	pub fn unsubscribe(&self) -> bool {
		self.set.upgrade().is_some_and(|set| set.remove(self.id))
	}
}

impl fmt::Debug for Unsubscribe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Unsubscribe").field("id", &self.id).finish()
	}
}
