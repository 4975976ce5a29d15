//! Error types for engine initialization and query execution

use dashboard_types::BundleTier;
use std::fmt;

/// A failure reported by the embedded engine backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct EngineFault(pub String);

impl EngineFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why a single bundle variant could not be used
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// A required asset locator was empty
    MissingLocator,
    /// A required asset did not probe as reachable
    Unreachable { url: String },
    /// The engine rejected the bundle
    Instantiation(EngineFault),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::MissingLocator => f.write_str("missing required asset locator"),
            AttemptFailure::Unreachable { url } => write!(f, "asset not reachable: {}", url),
            AttemptFailure::Instantiation(fault) => write!(f, "instantiation failed: {}", fault),
        }
    }
}

/// Every bundle variant was tried and none could be instantiated
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("engine initialization failed: {}", summarize(.attempts))]
pub struct InitializationError {
    /// Variants in the order they were attempted
    pub attempts: Vec<(BundleTier, AttemptFailure)>,
}

fn summarize(attempts: &[(BundleTier, AttemptFailure)]) -> String {
    if attempts.is_empty() {
        return "no bundle variants configured".to_string();
    }
    attempts
        .iter()
        .map(|(tier, failure)| format!("{}: {}", tier, failure))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A query could not be executed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("failed to open connection: {0}")]
    Connect(EngineFault),
    #[error("query failed: {0}")]
    Execute(EngineFault),
}

/// Errors surfaced by the dashboard engine service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Queried before a successful initialization
    #[error("engine is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
