use thiserror::Error;

/// Errors raised by the credential hashing layers.
///
/// None of the variants carry a password, salt or digest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    #[error("Malformed hash: {0}")]
    MalformedHash(&'static str),

    #[error("Empty password")]
    EmptyPassword,

    #[error("Secure randomness unavailable")]
    RandomnessUnavailable,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Hash computation failed: {0}")]
    HashComputation(String),

    #[error("Hashing worker failed")]
    WorkerFailed,

    #[error("Configuration error: {0}")]
    Config(String),
}
