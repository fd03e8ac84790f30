//! JSON file persistence for issued tokens.
//!
//! The file holds one [`Tokens`] document. A missing file means no session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::provider::Tokens;

#[derive(Debug, Error)]
pub enum TokenStoreError {
	#[error("failed to access token file {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("token file {} is not valid JSON: {source}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}

#[derive(Debug, Clone)]
pub struct TokenStore {
	path: PathBuf,
}

impl TokenStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// `<config dir>/authflow/tokens.json`, when the platform has a config dir.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("authflow").join("tokens.json"))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn load(&self) -> Result<Option<Tokens>, TokenStoreError> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(source) => return Err(self.io_error(source)),
		};

		let tokens = serde_json::from_str(&content).map_err(|source| TokenStoreError::Parse {
			path: self.path.clone(),
			source,
		})?;
		debug!(target = "authflow.store", path = %self.path.display(), "loaded tokens");
		Ok(Some(tokens))
	}

	pub fn save(&self, tokens: &Tokens) -> Result<(), TokenStoreError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
		}
		let json = serde_json::to_string_pretty(tokens).map_err(|source| TokenStoreError::Parse {
			path: self.path.clone(),
			source,
		})?;
		fs::write(&self.path, json).map_err(|source| self.io_error(source))?;
		debug!(target = "authflow.store", path = %self.path.display(), "saved tokens");
		Ok(())
	}

	/// Removes the file. Returns whether there was one.
	pub fn clear(&self) -> Result<bool, TokenStoreError> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
			Err(source) => Err(self.io_error(source)),
		}
	}

	fn io_error(&self, source: io::Error) -> TokenStoreError {
		TokenStoreError::Io {
			path: self.path.clone(),
			source,
		}
	}
}
