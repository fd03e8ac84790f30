//! `authflow` command-line client.
//!
//! Wraps an [`authflow::Session`] around [`HttpAuthClient`](provider::HttpAuthClient),
//! a provider that talks to a JSON auth API and persists tokens to a file so
//! the session survives between invocations.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod provider;
pub mod token_store;
