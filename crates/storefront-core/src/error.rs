use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("embedded product document not found: {reason}")]
    MissingEmbeddedProduct { reason: String },

    #[error("option position {position} is outside 1..={option_count}")]
    PositionOutOfRange {
        position: usize,
        option_count: usize,
    },

    #[error("invalid currency code \"{0}\": expected three ASCII letters")]
    InvalidCurrency(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
