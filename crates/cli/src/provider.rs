//! [`AuthClient`] backed by a JSON auth API.
//!
//! Endpoints, relative to the base URL:
//!
//! - `POST auth/login` with `{username, password}`
//! - `POST auth/refresh` with `{refreshToken}` and the current access token as bearer
//!
//! Both answer `{"data": {accessToken, refreshToken?, expiresIn?}}`. Error
//! responses may carry an `error` or `message` field, which becomes the
//! message of [`ProviderError::Status`].

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use authflow::{AuthClient, UnsupportedHook};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::token_store::{TokenStore, TokenStoreError};

#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("no base URL configured; pass --base-url or set AUTHFLOW_BASE_URL")]
	NoBaseUrl,

	#[error("login requires a username and password")]
	MissingCredentials,

	#[error("not logged in")]
	NotAuthenticated,

	#[error("stored tokens carry no refresh token")]
	MissingRefreshToken,

	#[error("server responded {status}: {message}")]
	Status { status: u16, message: String },

	#[error(transparent)]
	Http(#[from] reqwest::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Store(#[from] TokenStoreError),

	#[error(transparent)]
	Unsupported(#[from] UnsupportedHook),
}

/// Tokens as persisted and handed to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
	pub access_token: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	/// UNIX timestamp (seconds) after which the access token is rejected.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<u64>,
}

impl Tokens {
	/// Whether the access token is still valid `min_validity` after `now`.
	///
	/// Tokens without a known expiry are taken as valid.
	pub fn is_valid_for(&self, min_validity: Duration, now: u64) -> bool {
		match self.expires_at {
			Some(expires_at) => expires_at > now.saturating_add(min_validity.as_secs()),
			None => true,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
	data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedTokens {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<u64>,
}

impl IssuedTokens {
	fn into_tokens(self, now: u64) -> Tokens {
		Tokens {
			access_token: self.access_token,
			refresh_token: self.refresh_token,
			expires_at: self.expires_in.map(|secs| now.saturating_add(secs)),
		}
	}
}

pub struct HttpAuthClient {
	http: reqwest::Client,
	base_url: Option<String>,
	store: TokenStore,
}

impl HttpAuthClient {
	pub fn new(base_url: Option<String>, store: TokenStore) -> Self {
		Self {
			http: reqwest::Client::new(),
			base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
			store,
		}
	}

	/// Sends `GET {base}/{path}` with `tokens` as bearer and returns the body.
	pub async fn get(&self, path: &str, tokens: &Tokens) -> Result<String, ProviderError> {
		let url = self.endpoint(path)?;
		debug!(target = "authflow.http", %url, "authorized request");
		let response = self.http.get(url).bearer_auth(&tokens.access_token).send().await?;
		read_body(response).await
	}

	fn endpoint(&self, path: &str) -> Result<String, ProviderError> {
		let base = self.base_url.as_deref().ok_or(ProviderError::NoBaseUrl)?;
		Ok(format!("{base}/{}", path.trim_start_matches('/')))
	}

	async fn request_tokens(&self, request: RequestBuilder) -> Result<Tokens, ProviderError> {
		let response = request.send().await?;
		let issued: Envelope<IssuedTokens> = read_json(response).await?;
		Ok(issued.data.into_tokens(unix_now()))
	}
}

#[async_trait]
impl AuthClient for HttpAuthClient {
	type Tokens = Tokens;
	type Credentials = Credentials;
	type Error = ProviderError;

	async fn on_init(&self) -> Result<Option<Tokens>, ProviderError> {
		Ok(self.store.load()?)
	}

	async fn on_login(&self, credentials: Option<Credentials>) -> Result<Tokens, ProviderError> {
		let credentials = credentials.ok_or(ProviderError::MissingCredentials)?;
		let url = self.endpoint("auth/login")?;
		info!(target = "authflow.http", %url, username = %credentials.username, "logging in");

		let request = self.http.post(url).json(&json!({
			"username": credentials.username,
			"password": credentials.password,
		}));
		let tokens = self.request_tokens(request).await?;
		self.store.save(&tokens)?;
		Ok(tokens)
	}

	async fn on_refresh(&self, current: Option<&Tokens>, min_validity: Option<Duration>) -> Result<Option<Tokens>, ProviderError> {
		let current = current.ok_or(ProviderError::NotAuthenticated)?;
		if current.is_valid_for(min_validity.unwrap_or_default(), unix_now()) {
			debug!(target = "authflow.http", expires_at = ?current.expires_at, "access token still valid; skipping refresh");
			return Ok(Some(current.clone()));
		}

		let refresh_token = current.refresh_token.as_deref().ok_or(ProviderError::MissingRefreshToken)?;
		let url = self.endpoint("auth/refresh")?;
		info!(target = "authflow.http", %url, "refreshing tokens");

		let request = self
			.http
			.post(url)
			.bearer_auth(&current.access_token)
			.json(&json!({ "refreshToken": refresh_token }));
		let mut tokens = self.request_tokens(request).await?;
		if tokens.refresh_token.is_none() {
			tokens.refresh_token = current.refresh_token.clone();
		}
		self.store.save(&tokens)?;
		Ok(Some(tokens))
	}

	async fn on_logout(&self) -> Result<(), ProviderError> {
		let removed = self.store.clear()?;
		debug!(target = "authflow.http", removed, path = %self.store.path().display(), "cleared token file");
		Ok(())
	}
}

async fn read_body(response: Response) -> Result<String, ProviderError> {
	let status = response.status();
	let body = response.text().await?;
	if status.is_success() {
		Ok(body)
	} else {
		Err(ProviderError::Status {
			status: status.as_u16(),
			message: error_message(&body).unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
		})
	}
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
	let body = read_body(response).await?;
	Ok(serde_json::from_str(&body)?)
}

fn error_message(body: &str) -> Option<String> {
	let value: serde_json::Value = serde_json::from_str(body).ok()?;
	["error", "message"]
		.iter()
		.find_map(|field| value.get(field).and_then(|v| v.as_str()))
		.map(str::to_string)
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or_default()
}
