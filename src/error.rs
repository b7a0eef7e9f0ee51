use thiserror::Error;

/// Problems with what the user typed on the command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input - NOT a float")]
    InvalidInput,

    #[error("Invalid input - NOT an integer")]
    NotAnInteger,

    #[error("Invalid input - too big a number for display (max {max})")]
    TooLarge { max: usize },
}

/// Requests the reference digit table cannot satisfy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigitsError {
    #[error("digit count must not be negative, got {0}")]
    InvalidLength(i64),

    #[error("requested {requested} digits but only {available} are available")]
    InsufficientDigits { requested: usize, available: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid practice configuration: {0}")]
    Invalid(String),
}

/// Failures reading or writing the persisted JSON records
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read/write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Digits(#[from] DigitsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
