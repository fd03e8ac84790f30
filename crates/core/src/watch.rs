//! `tokio::sync::watch` bridge for async observers.

use std::sync::{Arc, OnceLock};

use authflow_protocol::SessionState;
use tokio::sync::watch;

use crate::client::AuthClient;
use crate::session::Session;
use crate::store::Unsubscribe;

impl<C: AuthClient> Session<C> {
	/// Returns a receiver that always holds the latest snapshot.
	///
	/// The receiver starts out with the current state marked as seen, so
	/// `changed().await` resolves on the next transition. The bridging
	/// subscriber removes itself on the first transition after every receiver
	/// has been dropped.
	pub fn watch(&self) -> watch::Receiver<Arc<SessionState<C::Tokens>>> {
		let (tx, rx) = watch::channel(self.snapshot());
		let handle: Arc<OnceLock<Unsubscribe>> = Arc::new(OnceLock::new());
		let session = Arc::downgrade(&self.inner);

		let unsubscribe = self.subscribe({
			let handle = Arc::clone(&handle);
			move || {
				let Some(inner) = session.upgrade() else {
					return;
				};
				let snapshot = Arc::clone(&inner.state.read());
				if tx.send(snapshot).is_err() {
					if let Some(unsubscribe) = handle.get() {
						unsubscribe.unsubscribe();
					}
				}
			}
		});
		let _ = handle.set(unsubscribe);

		rx
	}
}
