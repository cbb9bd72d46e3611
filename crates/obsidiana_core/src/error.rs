use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error("Cycle length out of range")]
    #[diagnostic(
        code(obsidiana_core::invalid_cycle_length),
        help("Cycle length must be between {min} and {max} days, got {provided}")
    )]
    InvalidCycleLength { provided: u32, min: u32, max: u32 },

    #[error("Invalid date")]
    #[diagnostic(
        code(obsidiana_core::invalid_date),
        help("Expected an ISO date (YYYY-MM-DD) for {field}")
    )]
    InvalidDate {
        field: String,
        value: String,
        #[source]
        cause: chrono::ParseError,
    },

    #[error("Invalid time")]
    #[diagnostic(
        code(obsidiana_core::invalid_time),
        help("Expected a 24-hour time (HH:MM) for {field}")
    )]
    InvalidTime {
        field: String,
        value: String,
        #[source]
        cause: chrono::ParseError,
    },

    #[error("No profile recorded")]
    #[diagnostic(
        code(obsidiana_core::profile_missing),
        help("Create one first with `obsidiana profile init`")
    )]
    ProfileMissing,

    #[error("Store I/O failed")]
    #[diagnostic(
        code(obsidiana_core::store_io_failed),
        help("Check that {path} exists and is writable")
    )]
    StoreIo {
        path: String,
        operation: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("Store document corrupt")]
    #[diagnostic(
        code(obsidiana_core::store_corrupt),
        help("The document under key '{key}' doesn't match its schema")
    )]
    StoreCorrupt {
        key: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("Serialization error")]
    #[diagnostic(
        code(obsidiana_core::serialization_error),
        help("Failed to serialize/deserialize {data_type}")
    )]
    SerializationError {
        data_type: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("Dream entry not found")]
    #[diagnostic(
        code(obsidiana_core::dream_not_found),
        help("List recorded dreams with `obsidiana dream list`")
    )]
    DreamNotFound { id: String },

    #[error("Agenda event not found")]
    #[diagnostic(
        code(obsidiana_core::event_not_found),
        help("List scheduled events with `obsidiana agenda list`")
    )]
    EventNotFound { id: String },

    #[error("Community post not found")]
    #[diagnostic(
        code(obsidiana_core::post_not_found),
        help("List the feed with `obsidiana feed list`")
    )]
    PostNotFound { id: String },

    #[error("Completion API key missing")]
    #[diagnostic(
        code(obsidiana_core::completion_key_missing),
        help("Set the {env_var} environment variable or configure [model] api_key_env")
    )]
    CompletionKeyMissing { env_var: String },

    #[error("Completion request failed")]
    #[diagnostic(
        code(obsidiana_core::completion_request_failed),
        help("Check network connectivity and the endpoint {endpoint}")
    )]
    CompletionRequestFailed {
        endpoint: String,
        model: String,
        #[source]
        cause: reqwest::Error,
    },

    #[error("Completion rejected by the API")]
    #[diagnostic(
        code(obsidiana_core::completion_rejected),
        help("Check API credentials and rate limits for {endpoint}")
    )]
    CompletionRejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Completion response empty")]
    #[diagnostic(
        code(obsidiana_core::completion_empty),
        help("The model '{model}' returned no choices")
    )]
    CompletionEmpty { model: String },

    #[error("Configuration error")]
    #[diagnostic(
        code(obsidiana_core::configuration_error),
        help("Check configuration file at {config_path}")
    )]
    ConfigurationError {
        config_path: String,
        field: String,
        expected: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Low-level configuration failure detail, carried as the cause of
/// [`CoreError::ConfigurationError`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(String),

    #[error("missing field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn invalid_cycle_length(provided: u32) -> Self {
        Self::InvalidCycleLength {
            provided,
            min: crate::cycle::MIN_CYCLE_LENGTH,
            max: crate::cycle::MAX_CYCLE_LENGTH,
        }
    }

    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>, cause: chrono::ParseError) -> Self {
        Self::InvalidDate {
            field: field.into(),
            value: value.into(),
            cause,
        }
    }

    pub fn invalid_time(field: impl Into<String>, value: impl Into<String>, cause: chrono::ParseError) -> Self {
        Self::InvalidTime {
            field: field.into(),
            value: value.into(),
            cause,
        }
    }

    pub fn store_io(path: impl Into<String>, operation: impl Into<String>, cause: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            operation: operation.into(),
            cause,
        }
    }

    pub fn store_corrupt(key: impl Into<String>, cause: serde_json::Error) -> Self {
        Self::StoreCorrupt {
            key: key.into(),
            cause,
        }
    }
}
