//! Minimal auth API served on a random local port.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const USERNAME: &str = "ada";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct AuthServer {
	logins: AtomicUsize,
	refreshes: AtomicUsize,
	bearers: Mutex<Vec<String>>,
}

impl AuthServer {
	pub fn logins(&self) -> usize {
		self.logins.load(Ordering::SeqCst)
	}

	pub fn refreshes(&self) -> usize {
		self.refreshes.load(Ordering::SeqCst)
	}

	/// Authorization headers seen by the refresh and profile endpoints.
	pub fn bearers(&self) -> Vec<String> {
		self.bearers.lock().clone()
	}

	fn record_bearer(&self, headers: &HeaderMap) -> Option<String> {
		let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.to_string();
		self.bearers.lock().push(value.clone());
		Some(value)
	}
}

/// Starts the server and returns its base URL.
pub async fn spawn_server() -> (String, Arc<AuthServer>) {
	let state = Arc::new(AuthServer::default());
	let app = Router::new()
		.route("/auth/login", post(login))
		.route("/auth/refresh", post(refresh))
		.route("/profile", get(profile))
		.with_state(Arc::clone(&state));

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
	let addr = listener.local_addr().expect("test server address");
	tokio::spawn(async move {
		axum::serve(listener, app).await.expect("test server");
	});

	(format!("http://{addr}"), state)
}

async fn login(State(state): State<Arc<AuthServer>>, Json(body): Json<Value>) -> Response {
	state.logins.fetch_add(1, Ordering::SeqCst);
	if body["username"] == USERNAME && body["password"] == PASSWORD {
		Json(json!({
			"data": { "accessToken": "access-1", "refreshToken": "refresh-1", "expiresIn": 3600 }
		}))
		.into_response()
	} else {
		(StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid credentials" }))).into_response()
	}
}

async fn refresh(State(state): State<Arc<AuthServer>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	state.refreshes.fetch_add(1, Ordering::SeqCst);
	state.record_bearer(&headers);
	if body["refreshToken"] == "refresh-1" {
		Json(json!({ "data": { "accessToken": "access-2", "expiresIn": 3600 } })).into_response()
	} else {
		(StatusCode::UNAUTHORIZED, Json(json!({ "message": "refresh token revoked" }))).into_response()
	}
}

async fn profile(State(state): State<Arc<AuthServer>>, headers: HeaderMap) -> Response {
	match state.record_bearer(&headers).as_deref() {
		Some("Bearer access-1" | "Bearer access-2") => Json(json!({ "name": USERNAME })).into_response(),
		_ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "missing or invalid token" }))).into_response(),
	}
}

/// Writes a token file as the CLI would persist it.
pub fn write_tokens(path: &std::path::Path, access: &str, refresh: Option<&str>, expires_at: u64) {
	let mut tokens = json!({ "accessToken": access, "expiresAt": expires_at });
	if let Some(refresh) = refresh {
		tokens["refreshToken"] = json!(refresh);
	}
	std::fs::write(path, tokens.to_string()).expect("write token file");
}

pub fn unix_now() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.expect("clock after epoch")
		.as_secs()
}
