//! Error types for the view layer.

use thiserror::Error;

/// A specialized `Result` type for view operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur in the view controller.
///
/// Note that an adapter reporting no renderable content is *not* an error;
/// the controller renders a placeholder view instead, since the
/// topology must stay presentable through transient filter states.
#[derive(Error, Debug)]
pub enum Error {
    /// An unexpected layout failure that is not a plain empty-content
    /// condition.
    #[error("layout error: {0}")]
    Layout(#[from] toposcope_layout::Error),

    /// An error during geometry serialization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
