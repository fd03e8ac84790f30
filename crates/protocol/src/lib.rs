//! Data types for the authflow session protocol.
//!
//! This crate contains the serde-serializable types shared by the session
//! controller and anything that reports on it (the CLI, log sinks, UI
//! bindings). They describe the shapes of data only.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond accessors and serialization
//! * Opaque over tokens: [`SessionState`] is generic over the token payload
//! * Stable: Event names match the camelCase names observers subscribe with
//!
//! The controller itself lives in the `authflow` crate.

pub mod event;
pub mod state;

pub use event::*;
pub use state::*;
