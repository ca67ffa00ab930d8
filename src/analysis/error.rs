use crate::select::SelectionError;
use crate::toolkit;
use thiserror::Error;

/// Errors that abort a bridge analysis.
///
/// Finding no bridging waters or no interactions is not an error; it produces an empty
/// [`BridgeReport`](super::BridgeReport).
#[derive(Debug, Error)]
pub enum Error {
    /// A domain expression could not be parsed.
    #[error("invalid selection: {0}")]
    Selection(#[from] SelectionError),

    /// The toolkit rejected a query or could not resolve an atom unambiguously.
    #[error("toolkit query failed: {0}")]
    Toolkit(#[from] toolkit::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// A configuration file is not valid TOML or has unknown keys.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }
}
