//! Domain error types.

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("data error at row {row}, field {field}: {reason}")]
    Data {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BandtraderError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        BandtraderError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn data(row: usize, field: &str, reason: impl Into<String>) -> Self {
        BandtraderError::Data {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::InvalidParameter { .. } => 3,
            BandtraderError::Data { .. } => 4,
        }
    }
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
