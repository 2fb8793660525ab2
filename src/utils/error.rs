use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Remote store returned {status}: {message}")]
    RemoteStoreError { status: u16, message: String },

    #[error("Restaurant not found in database: {name}")]
    RestaurantNotFound { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    RemoteData,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_) | EtlError::ValidationError { .. } => ErrorCategory::Input,
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::RemoteStoreError { .. } | EtlError::RestaurantNotFound { .. } => {
                ErrorCategory::RemoteData
            }
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::RestaurantNotFound { .. } => ErrorSeverity::Low,
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::RemoteStoreError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } if field == "SUPABASE_SERVICE_KEY" => [
                "Please set it before running:",
                "  export SUPABASE_SERVICE_KEY=\"your_service_role_key_here\"",
                "  menu-sync",
                "",
                "Or run it inline:",
                "  SUPABASE_SERVICE_KEY=\"your_key\" menu-sync",
            ]
            .join("\n"),
            EtlError::MissingConfigError { field } if field == "SUPABASE_URL" => {
                "Pass --supabase-url, set SUPABASE_URL, or add [supabase] url to the config file"
                    .to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, .. }
            | EtlError::ConfigValidationError { field, .. } => {
                format!("Check the value of '{}' on the command line or in the config file", field)
            }
            EtlError::ConfigError { .. } => "Check the config file syntax".to_string(),
            EtlError::CsvError(_) => {
                "Make sure the file has the columns restaurant_name, dish_name, category, price"
                    .to_string()
            }
            EtlError::ValidationError { .. } => {
                "Fix the offending rows in the input file and run again".to_string()
            }
            EtlError::ApiError(_) => "Check network connectivity and the Supabase URL".to_string(),
            EtlError::RemoteStoreError { status, .. } if *status == 401 || *status == 403 => {
                "Check that SUPABASE_SERVICE_KEY is a service role key".to_string()
            }
            EtlError::RemoteStoreError { .. } => {
                "Inspect the response message and the table schema".to_string()
            }
            EtlError::RestaurantNotFound { .. } => {
                "Create the restaurant in the restaurants table first".to_string()
            }
            EtlError::IoError(_) => "Check that the paths exist and are writable".to_string(),
            EtlError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } => {
                format!("Error: {} environment variable not set!", field)
            }
            EtlError::RestaurantNotFound { .. } => "Restaurant not found in database!".to_string(),
            EtlError::CsvError(e) => format!("Could not read the input file: {}", e),
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

/// Logs a fatal error, prints the message and recovery hint to stderr, then exits.
pub fn exit_on_error(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!();
    eprintln!("{}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
