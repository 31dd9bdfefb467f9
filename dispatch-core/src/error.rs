use thiserror::Error;

/// Failures at the fallible edges of the console. State transitions
/// themselves never fail.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[cfg(feature = "journal")]
    #[error("journal storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid intake: {0}")]
    Intake(#[from] intake_registry::IntakeError),

    #[error("chat text is empty")]
    EmptyChat,

    #[error("llm error: {0}")]
    Llm(String),
}
