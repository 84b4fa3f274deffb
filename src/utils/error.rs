use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not authenticated")]
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
    Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Http(_) => ErrorCategory::Network,
            AppError::Api { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            AppError::Api { .. } => ErrorCategory::Network,
            AppError::Csv(_) | AppError::Serialization(_) | AppError::Validation { .. } => {
                ErrorCategory::Data
            }
            AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::FileNotFound { .. } => ErrorCategory::Storage,
            AppError::TomlParse(_)
            | AppError::Url(_)
            | AppError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            AppError::PasswordHash { .. } | AppError::NotAuthenticated => ErrorCategory::Auth,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        if self.is_retryable() {
            return ErrorSeverity::Medium;
        }
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Storage => match self {
                AppError::FileNotFound { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Critical,
            },
            ErrorCategory::Network | ErrorCategory::Data | ErrorCategory::Auth => {
                ErrorSeverity::High
            }
        }
    }

    /// Transport failures and 5xx/429 responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Http(e) => e.is_timeout() || e.is_connect(),
            AppError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::FileNotFound { .. } => "File not found.".to_string(),
            AppError::Io(_) => "Could not open file.".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Http(_) => "Could not reach the Six Wraps API.".to_string(),
            AppError::NotAuthenticated => "You are not logged in.".to_string(),
            AppError::Database(_) | AppError::Migration(_) => {
                "The user database is unavailable.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the api.api_path setting and your network connection",
            ErrorCategory::Auth => "Run `six-wraps login` or pass a valid --token",
            ErrorCategory::Data => "Inspect the input data for malformed rows or fields",
            ErrorCategory::Storage => "Check that the file or database path exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
