//! Observable authentication sessions over pluggable token providers.
//!
//! `authflow` wraps an [`AuthClient`] (the code that actually talks to an
//! identity provider or reads persisted tokens) in a [`Session`]: a small state
//! machine that tracks whether the session is initialized and authenticated,
//! keeps the latest tokens, and tells observers about every transition.
//!
//! # Example
//!
//! ```no_run
//! use authflow::{AuthClient, AuthEventKind, Session, UnsupportedHook};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum Error {
//!     #[error("bad credentials")]
//!     BadCredentials,
//!     #[error(transparent)]
//!     Unsupported(#[from] UnsupportedHook),
//! }
//!
//! struct Client;
//!
//! #[async_trait]
//! impl AuthClient for Client {
//!     type Tokens = String;
//!     type Credentials = (String, String);
//!     type Error = Error;
//!
//!     async fn on_login(&self, credentials: Option<Self::Credentials>) -> Result<String, Error> {
//!         match credentials {
//!             Some((user, pass)) if user == "demo" && pass == "demo" => Ok("token".into()),
//!             _ => Err(Error::BadCredentials),
//!         }
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let session = Session::new(Client);
//! session.on(AuthEventKind::LoginFailed, |event| eprintln!("{event:?}"));
//!
//! session.init().await;
//! let ok = session.login(Some(("demo".into(), "demo".into()))).await;
//! assert!(ok && session.is_authenticated());
//! # }
//! ```
//!
//! # Refresh deduplication
//!
//! [`Session::refresh`] may be called from many tasks at once. Only the first
//! caller triggers a call to [`AuthClient::on_refresh`]; everyone arriving
//! while it is in flight waits for the same outcome.

pub mod client;
pub mod event;
pub mod session;
pub mod store;
mod watch;

pub use authflow_protocol::{AuthEventKind, Operation, SessionState};
pub use authflow_runtime::ListenerId;
pub use client::{AuthClient, UnsupportedHook};
pub use event::AuthEvent;
pub use session::Session;
pub use store::Unsubscribe;
