use clap::ValueEnum;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// Pretty-printed JSON envelope
	Json,
	/// Single-line JSON envelope
	Ndjson,
	/// TOON envelope
	Toon,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_flag_values_case_insensitively() {
		assert_eq!(OutputFormat::from_str("JSON", true), Ok(OutputFormat::Json));
		assert_eq!(OutputFormat::from_str("ndjson", false), Ok(OutputFormat::Ndjson));
		assert!(OutputFormat::from_str("yaml", true).is_err());
	}
}
