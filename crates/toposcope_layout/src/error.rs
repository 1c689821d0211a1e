//! Error types for layout adapters.

use thiserror::Error;

/// A specialized `Result` type for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while building layout geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The adapter has nothing to draw: zero systems, or zero surviving
    /// edges for an adapter that requires them. Callers surface this as a
    /// placeholder view, never as a hard failure.
    #[error("no renderable content: {0}")]
    NoRenderableContent(String),
}
