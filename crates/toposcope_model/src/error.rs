//! Error types for topology model operations.

use thiserror::Error;

/// A specialized `Result` type for topology model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while editing a topology.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A connection endpoint referenced a system that does not exist.
    #[error("unknown system: {0}")]
    UnknownSystem(String),

    /// A connection was requested with identical source and target.
    #[error("self-loop rejected: {0}")]
    SelfLoop(String),

    /// The directed pair (source, target) already has a connection.
    #[error("duplicate connection: {0}")]
    DuplicateConnection(String),

    /// The directed pair (source, target) has no connection to remove.
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),
}
