/*!
Common error types for the Digimatic protocol library.
*/

use thiserror::Error;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, DigimaticError>;

/// Construction-time pin configuration failures.
///
/// The only fatal error condition in the decoder: a reader cannot exist
/// without data, clock and one of the two request line flavors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input pin was not supplied
    #[error("missing `{0}` pin")]
    MissingPin(&'static str),

    /// Neither the active-high nor the active-low request pin was supplied
    #[error("missing `request` or `inverted_request` pin")]
    MissingRequest,
}

/// Aggregate error type for library operations
#[derive(Error, Debug)]
pub enum DigimaticError {
    /// Pin configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structural frame defects
    #[error("frame defect: {0}")]
    Frame(#[from] crate::frame::FrameDefect),
}
