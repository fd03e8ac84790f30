use authflow::Operation;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("could not determine a config directory; pass --token-file")]
	NoConfigDir,

	#[error("{0} did not succeed")]
	OperationFailed(Operation),

	#[error(transparent)]
	Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, CliError>;
