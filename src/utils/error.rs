use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Invalid argument '{field}' = {value}: {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Check-in processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that failed at this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl GeoError {
    pub fn invalid_argument(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        GeoError::InvalidArgument {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GeoError::InvalidArgument { .. } | GeoError::CsvError(_) => ErrorCategory::Input,
            GeoError::ConfigValidationError { .. }
            | GeoError::InvalidConfigValueError { .. }
            | GeoError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GeoError::IoError(_) | GeoError::ZipError(_) => ErrorCategory::Io,
            GeoError::SerializationError(_) | GeoError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GeoError::InvalidArgument { field, .. } => format!(
                "Check '{}': latitude must be within [-90, 90] and longitude within [-180, 180]",
                field
            ),
            GeoError::CsvError(_) => {
                "Check the input header: employee_id,workplace_id,recorded_at,latitude,longitude"
                    .to_string()
            }
            GeoError::IoError(_) => {
                "Verify that the input file exists and the output directory is writable".to_string()
            }
            GeoError::ZipError(_) => "Disable compression or free disk space and retry".to_string(),
            GeoError::SerializationError(_) => {
                "Report data could not be encoded; rerun with --verbose for details".to_string()
            }
            GeoError::ConfigValidationError { field, .. }
            | GeoError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in the configuration file", field)
            }
            GeoError::MissingConfigError { field } => {
                format!("Add the '{}' entry to the configuration file", field)
            }
            GeoError::ProcessingError { .. } => {
                "Inspect the rejected rows or run without --strict".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
