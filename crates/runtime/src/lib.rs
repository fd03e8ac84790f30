//! Concurrency primitives behind the authflow session controller.
//!
//! * [`Deferred`] - a one-shot result that many tasks can await
//! * [`EventChannel`] - keyed, synchronous, fire-and-forget listener registry
//! * [`isolate`] - runs observer code so that its panics stay contained

pub mod deferred;
pub mod event_channel;

pub use deferred::Deferred;
pub use event_channel::{EventChannel, Listener, ListenerId};

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Runs `f`, swallowing any panic it raises.
///
/// Returns `false` when `f` panicked. Observer callbacks go through this so a
/// broken listener cannot unwind into the code that notified it.
pub fn isolate<F: FnOnce()>(f: F) -> bool {
	catch_unwind(AssertUnwindSafe(f)).is_ok()
}
