//! Keyed multi-listener event bus.
//!
//! Emission is synchronous: [`EventChannel::emit`] calls every listener
//! registered for the key, in registration order, before returning. Nothing
//! is buffered, so listeners registered after an emission never see it.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::isolate;

/// Shared listener callback.
pub type Listener<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Handle identifying a registered listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of listeners keyed by event kind `K`, receiving payloads of type `A`.
pub struct EventChannel<K, A: ?Sized> {
	next_id: AtomicU64,
	listeners: Mutex<HashMap<K, Vec<(ListenerId, Listener<A>)>>>,
}

impl<K, A> EventChannel<K, A>
where
	K: Copy + Eq + Hash,
	A: ?Sized,
{
	pub fn new() -> Self {
		Self {
			next_id: AtomicU64::new(0),
			listeners: Mutex::new(HashMap::new()),
		}
	}

	/// Registers `listener` for `key` and returns its id.
	///
	/// Registering the same closure twice yields two independent entries.
	pub fn on<F>(&self, key: K, listener: F) -> ListenerId
	where
		F: Fn(&A) + Send + Sync + 'static,
	{
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().entry(key).or_default().push((id, Arc::new(listener)));
		id
	}

	/// Removes the listener `id` from `key`.
	///
	/// Returns `false` (and does nothing else) when no such listener is
	/// registered for that key.
	pub fn off(&self, key: K, id: ListenerId) -> bool {
		let mut listeners = self.listeners.lock();
		let Some(entries) = listeners.get_mut(&key) else {
			return false;
		};

		let before = entries.len();
		entries.retain(|(entry_id, _)| *entry_id != id);
		let removed = entries.len() != before;

		if entries.is_empty() {
			listeners.remove(&key);
		}
		removed
	}

	pub fn listener_count(&self, key: K) -> usize {
		self.listeners.lock().get(&key).map_or(0, Vec::len)
	}

	/// Delivers `payload` to every listener currently registered for `key`.
	///
	/// Listeners run outside the registry lock, so they may register or remove
	/// listeners themselves; such changes apply from the next emission on. A
	/// panicking listener is skipped over. Returns the number of listeners
	/// invoked.
	pub fn emit(&self, key: K, payload: &A) -> usize {
		let targets: Vec<Listener<A>> = match self.listeners.lock().get(&key) {
			Some(entries) => entries.iter().map(|(_, listener)| Arc::clone(listener)).collect(),
			None => return 0,
		};

		for listener in &targets {
			isolate(|| listener(payload));
		}
		targets.len()
	}
}

impl<K, A> Default for EventChannel<K, A>
where
	K: Copy + Eq + Hash,
	A: ?Sized,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, A: ?Sized> fmt::Debug for EventChannel<K, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registered: usize = self.listeners.lock().values().map(Vec::len).sum();
		f.debug_struct("EventChannel").field("listeners", &registered).finish()
	}
}
