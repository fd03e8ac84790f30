use std::sync::Arc;

use authflow::{AuthEventKind, Session};
use parking_lot::Mutex;

use crate::provider::HttpAuthClient;

/// Collects the events of one command run.
///
/// Keeps every event kind in order plus the message of the latest failure.
#[derive(Clone, Default)]
pub(crate) struct EventLog {
	kinds: Arc<Mutex<Vec<AuthEventKind>>>,
	last_error: Arc<Mutex<Option<String>>>,
}

impl EventLog {
	/// Registers a listener for every event kind on `session`.
	///
	/// With `trace` set, each event is also written to stderr as it fires.
	pub(crate) fn attach(session: &Session<HttpAuthClient>, trace: bool) -> Self {
		let log = Self::default();
		for kind in AuthEventKind::ALL {
			let sink = log.clone();
			session.on(kind, move |event| {
				sink.kinds.lock().push(event.kind());
				if let Some(err) = event.error() {
					*sink.last_error.lock() = Some(err.to_string());
				}
				if trace {
					eprintln!("[event] {event}");
				}
			});
		}
		log
	}

	pub(crate) fn saw(&self, kind: AuthEventKind) -> bool {
		self.kinds.lock().contains(&kind)
	}

	pub(crate) fn names(&self) -> Vec<String> {
		self.kinds.lock().iter().map(|kind| kind.as_str().to_string()).collect()
	}

	pub(crate) fn last_error(&self) -> String {
		self.last_error.lock().clone().unwrap_or_else(|| "unknown error".to_string())
	}
}
