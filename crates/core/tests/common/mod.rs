//! Scripted auth clients shared by the session integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authflow::{AuthClient, AuthEventKind, Session, UnsupportedHook};
use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
	pub token: String,
}

pub fn tokens(token: &str) -> Tokens {
	Tokens { token: token.to_string() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
	#[error("rejected: {0}")]
	Rejected(String),
	#[error(transparent)]
	Unsupported(#[from] UnsupportedHook),
}

pub fn rejected(reason: &str) -> MockError {
	MockError::Rejected(reason.to_string())
}

/// Client implementing every hook, answering from a script and recording
/// each call in order.
pub struct ScriptedClient {
	calls: Mutex<Vec<String>>,
	init: Mutex<Result<Option<Tokens>, MockError>>,
	login: Mutex<Result<Tokens, MockError>>,
	refresh: Mutex<Result<Option<Tokens>, MockError>>,
	logout: Mutex<Result<(), MockError>>,
	refresh_gate: Option<Arc<Notify>>,
	refresh_panics: bool,
	refresh_args: Mutex<Vec<(Option<Tokens>, Option<Duration>)>>,
	login_args: Mutex<Vec<Option<Credentials>>>,
}

impl ScriptedClient {
	pub fn new() -> Self {
		Self {
			calls: Mutex::new(Vec::new()),
			init: Mutex::new(Ok(None)),
			login: Mutex::new(Ok(tokens("t1"))),
			refresh: Mutex::new(Ok(Some(tokens("t2")))),
			logout: Mutex::new(Ok(())),
			refresh_gate: None,
			refresh_panics: false,
			refresh_args: Mutex::new(Vec::new()),
			login_args: Mutex::new(Vec::new()),
		}
	}

	pub fn with_init(self, result: Result<Option<Tokens>, MockError>) -> Self {
		*self.init.lock() = result;
		self
	}

	pub fn with_login(self, result: Result<Tokens, MockError>) -> Self {
		*self.login.lock() = result;
		self
	}

	pub fn with_refresh(self, result: Result<Option<Tokens>, MockError>) -> Self {
		*self.refresh.lock() = result;
		self
	}

	pub fn with_logout(self, result: Result<(), MockError>) -> Self {
		*self.logout.lock() = result;
		self
	}

	/// Makes `on_refresh` wait for a permit on `gate` before answering.
	pub fn with_refresh_gate(mut self, gate: Arc<Notify>) -> Self {
		self.refresh_gate = Some(gate);
		self
	}

	/// Makes `on_refresh` panic after yielding once.
	pub fn with_refresh_panic(mut self) -> Self {
		self.refresh_panics = true;
		self
	}

	pub fn set_init(&self, result: Result<Option<Tokens>, MockError>) {
		*self.init.lock() = result;
	}

	pub fn set_refresh(&self, result: Result<Option<Tokens>, MockError>) {
		*self.refresh.lock() = result;
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	pub fn count(&self, hook: &str) -> usize {
		self.calls.lock().iter().filter(|call| call.as_str() == hook).count()
	}

	pub fn refresh_args(&self) -> Vec<(Option<Tokens>, Option<Duration>)> {
		self.refresh_args.lock().clone()
	}

	pub fn login_args(&self) -> Vec<Option<Credentials>> {
		self.login_args.lock().clone()
	}

	fn record(&self, call: impl Into<String>) {
		self.calls.lock().push(call.into());
	}
}

#[async_trait]
impl AuthClient for ScriptedClient {
	type Tokens = Tokens;
	type Credentials = Credentials;
	type Error = MockError;

	async fn on_init(&self) -> Result<Option<Tokens>, MockError> {
		self.record("init");
		self.init.lock().clone()
	}

	async fn on_post_init(&self) {
		self.record("post_init");
	}

	async fn on_pre_login(&self) {
		self.record("pre_login");
	}

	async fn on_login(&self, credentials: Option<Credentials>) -> Result<Tokens, MockError> {
		self.record("login");
		self.login_args.lock().push(credentials);
		self.login.lock().clone()
	}

	async fn on_post_login(&self, success: bool) {
		self.record(format!("post_login:{success}"));
	}

	async fn on_pre_refresh(&self) {
		self.record("pre_refresh");
	}

	async fn on_refresh(&self, current: Option<&Tokens>, min_validity: Option<Duration>) -> Result<Option<Tokens>, MockError> {
		self.record("refresh");
		self.refresh_args.lock().push((current.cloned(), min_validity));
		if let Some(gate) = &self.refresh_gate {
			gate.notified().await;
		}
		if self.refresh_panics {
			tokio::task::yield_now().await;
			panic!("refresh hook bug");
		}
		self.refresh.lock().clone()
	}

	async fn on_post_refresh(&self, success: bool) {
		self.record(format!("post_refresh:{success}"));
	}

	async fn on_pre_logout(&self) {
		self.record("pre_logout");
	}

	async fn on_logout(&self) -> Result<(), MockError> {
		self.record("logout");
		self.logout.lock().clone()
	}

	async fn on_post_logout(&self, success: bool) {
		self.record(format!("post_logout:{success}"));
	}
}

/// Client implementing only the mandatory login hook.
pub struct LoginOnlyClient;

#[async_trait]
impl AuthClient for LoginOnlyClient {
	type Tokens = Tokens;
	type Credentials = Credentials;
	type Error = MockError;

	async fn on_login(&self, _credentials: Option<Credentials>) -> Result<Tokens, MockError> {
		Ok(tokens("t1"))
	}
}

/// Records the kind of every event the session emits.
pub fn record_events<C: AuthClient>(session: &Session<C>) -> Arc<Mutex<Vec<AuthEventKind>>> {
	let log = Arc::new(Mutex::new(Vec::new()));
	for kind in AuthEventKind::ALL {
		let log = Arc::clone(&log);
		session.on(kind, move |event| log.lock().push(event.kind()));
	}
	log
}

/// Yields until `condition` holds, failing the test after a few seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
	tokio::time::timeout(Duration::from_secs(5), async {
		while !condition() {
			tokio::task::yield_now().await;
		}
	})
	.await
	.expect("condition not reached in time");
}
